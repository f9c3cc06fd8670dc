use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::rapidapi::{RapidApiClient, RapidApiEndpoint};
use super::{PropertyProvider, ProviderError};
use crate::search::domain::{Property, ProviderQuery};
use crate::search::normalizer::{normalize_hotels, HOTELS};
use crate::search::plausible::PlausibleValues;

pub const HOTELS_HOST: &str = "hotels-com-provider.p.rapidapi.com";
const SEARCH_BY_MAP: &str = "/v2/hotels/search-by-map";
const PROPERTIES: &str = "/data/propertySearch/properties";

/// Hotels.com map search.
pub struct HotelsProvider {
    client: RapidApiClient,
    endpoint: RapidApiEndpoint,
    values: Arc<PlausibleValues>,
}

impl HotelsProvider {
    pub fn new(client: RapidApiClient, base_url: &str, values: Arc<PlausibleValues>) -> Self {
        Self {
            client,
            endpoint: RapidApiEndpoint::new(base_url, HOTELS_HOST),
            values,
        }
    }

    fn params(query: &ProviderQuery) -> Vec<(&'static str, String)> {
        vec![
            ("rooms_number", "1".to_string()),
            ("adults_number", query.guests.to_string()),
            ("bbox", query.bounds.to_string()),
            ("checkin_date", query.stay.check_in.to_string()),
            ("checkout_date", query.stay.check_out.to_string()),
            ("currency", "USD".to_string()),
            ("locale", "en_US".to_string()),
            ("sort_order", "REVIEW".to_string()),
            ("page_number", "1".to_string()),
        ]
    }
}

#[async_trait]
impl PropertyProvider for HotelsProvider {
    fn source_name(&self) -> &'static str {
        HOTELS.source
    }

    async fn search(&self, query: &ProviderQuery) -> Result<Vec<Property>, ProviderError> {
        let payload = self
            .client
            .get_json(
                &self.endpoint,
                SEARCH_BY_MAP,
                &Self::params(query),
                &query.credential,
            )
            .await?;

        match payload.pointer(PROPERTIES) {
            Some(Value::Array(records)) => Ok(records
                .iter()
                .map(|record| normalize_hotels(record, &query.destination, &self.values))
                .collect()),
            None | Some(Value::Null) => {
                debug!(destination = %query.destination, "hotels.com returned no property list");
                Ok(Vec::new())
            }
            Some(_) => Err(ProviderError::Payload(format!(
                "`{PROPERTIES}` is not an array"
            ))),
        }
    }
}
