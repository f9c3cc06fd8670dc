use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::rapidapi::{RapidApiClient, RapidApiEndpoint};
use super::{PropertyProvider, ProviderError};
use crate::search::domain::{Property, ProviderQuery};
use crate::search::normalizer::{normalize_booking, BOOKING};
use crate::search::plausible::PlausibleValues;

pub const BOOKING_HOST: &str = "apidojo-booking-v1.p.rapidapi.com";
const LIST_BY_MAP: &str = "/properties/list-by-map";

/// Booking.com map search.
pub struct BookingProvider {
    client: RapidApiClient,
    endpoint: RapidApiEndpoint,
    values: Arc<PlausibleValues>,
}

impl BookingProvider {
    pub fn new(client: RapidApiClient, base_url: &str, values: Arc<PlausibleValues>) -> Self {
        Self {
            client,
            endpoint: RapidApiEndpoint::new(base_url, BOOKING_HOST),
            values,
        }
    }

    fn params(query: &ProviderQuery) -> Vec<(&'static str, String)> {
        vec![
            ("room_qty", "1".to_string()),
            ("guest_qty", query.guests.to_string()),
            ("bbox", query.bounds.to_string()),
            ("arrival_date", query.stay.check_in.to_string()),
            ("departure_date", query.stay.check_out.to_string()),
            ("search_id", "none".to_string()),
            ("children_age", String::new()),
            ("price_filter_currencycode", "USD".to_string()),
            (
                "categories_filter",
                "class::1,class::2,class::3,class::4,class::5".to_string(),
            ),
            ("languagecode", "en-us".to_string()),
            ("travel_purpose", "leisure".to_string()),
            ("children_qty", "0".to_string()),
            ("order_by", "popularity".to_string()),
            ("offset", "0".to_string()),
        ]
    }
}

#[async_trait]
impl PropertyProvider for BookingProvider {
    fn source_name(&self) -> &'static str {
        BOOKING.source
    }

    async fn search(&self, query: &ProviderQuery) -> Result<Vec<Property>, ProviderError> {
        let payload = self
            .client
            .get_json(
                &self.endpoint,
                LIST_BY_MAP,
                &Self::params(query),
                &query.credential,
            )
            .await?;

        match payload.get("result") {
            Some(Value::Array(records)) => Ok(records
                .iter()
                .map(|record| normalize_booking(record, &query.destination, &self.values))
                .collect()),
            None | Some(Value::Null) => {
                debug!(destination = %query.destination, "booking.com returned no result list");
                Ok(Vec::new())
            }
            Some(_) => Err(ProviderError::Payload(
                "`result` is not an array".to_string(),
            )),
        }
    }
}
