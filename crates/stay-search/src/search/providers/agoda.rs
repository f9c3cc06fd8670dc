use async_trait::async_trait;
use std::sync::Arc;

use super::airbnb::strings;
use super::{PropertyProvider, ProviderError};
use crate::search::domain::{ListingOrigin, NightlyPrice, Property, PropertyLocation, ProviderQuery};
use crate::search::normalizer::enforce_invariants;
use crate::search::plausible::PlausibleValues;

pub const AGODA: ListingOrigin = ListingOrigin {
    id_prefix: "agoda",
    source: "agoda.com",
};

/// Sample Agoda listings; the hosted Agoda API exposes hotel details only.
pub struct AgodaProvider {
    values: Arc<PlausibleValues>,
}

impl AgodaProvider {
    pub fn new(values: Arc<PlausibleValues>) -> Self {
        Self { values }
    }

    fn listings_for(&self, destination: &str) -> Vec<Property> {
        let values = &self.values;
        vec![
            Property {
                id: AGODA.listing_id(&values.id_token()),
                name: format!("{destination} Luxury Resort & Spa"),
                location: PropertyLocation {
                    city: destination.to_string(),
                    address: format!("555 Paradise Blvd, {destination}"),
                    coordinates: [0.0, 0.0],
                },
                price: NightlyPrice::usd(values.price(150, 200)),
                images: vec![
                    "https://images.unsplash.com/photo-1566073771259-6a8506099945".to_string(),
                ],
                rating: values.rating_from(4.5),
                review_count: values.review_count(100, 250),
                amenities: strings(&["Pool", "Spa", "Restaurant", "Bar", "Gym", "Beach Access"]),
                description: format!("Luxury resort experience in {destination}."),
                source: AGODA.source.to_string(),
                property_type: "Resort".to_string(),
                vacation_styles: strings(&["Luxury", "Beach", "Wellness"]),
                rooms: Vec::new(),
            },
            Property {
                id: AGODA.listing_id(&values.id_token()),
                name: format!("{destination} Business Hotel"),
                location: PropertyLocation {
                    city: destination.to_string(),
                    address: format!("200 Business District, {destination}"),
                    coordinates: [0.0, 0.0],
                },
                price: NightlyPrice::usd(values.price(120, 100)),
                images: vec![
                    "https://images.unsplash.com/photo-1551882547-ff40c63fe5fa".to_string(),
                ],
                rating: values.rating_from(4.0),
                review_count: values.review_count(80, 180),
                amenities: strings(&[
                    "WiFi",
                    "Business Center",
                    "Conference Room",
                    "Restaurant",
                    "Fitness Center",
                ]),
                description: format!("Perfect for business travelers in {destination}."),
                source: AGODA.source.to_string(),
                property_type: "Hotel".to_string(),
                vacation_styles: strings(&["Business", "City"]),
                rooms: Vec::new(),
            },
        ]
    }
}

#[async_trait]
impl PropertyProvider for AgodaProvider {
    fn source_name(&self) -> &'static str {
        AGODA.source
    }

    async fn search(&self, query: &ProviderQuery) -> Result<Vec<Property>, ProviderError> {
        let destination = query.destination.as_str();
        Ok(self
            .listings_for(destination)
            .into_iter()
            .map(|listing| enforce_invariants(listing, destination, &self.values))
            .collect())
    }
}
