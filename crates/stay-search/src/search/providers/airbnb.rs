use async_trait::async_trait;
use std::sync::Arc;

use super::{PropertyProvider, ProviderError};
use crate::search::domain::{ListingOrigin, NightlyPrice, Property, PropertyLocation, ProviderQuery};
use crate::search::normalizer::enforce_invariants;
use crate::search::plausible::PlausibleValues;

pub const AIRBNB: ListingOrigin = ListingOrigin {
    id_prefix: "airbnb",
    source: "airbnb.com",
};

/// Sample Airbnb listings. The hosted Airbnb API only offers per-listing
/// lookups, so there is nothing to search against yet.
pub struct AirbnbProvider {
    values: Arc<PlausibleValues>,
}

impl AirbnbProvider {
    pub fn new(values: Arc<PlausibleValues>) -> Self {
        Self { values }
    }

    fn apartment(&self, destination: &str) -> Property {
        Property {
            id: AIRBNB.listing_id(&self.values.id_token()),
            name: format!("Modern {destination} Apartment"),
            location: PropertyLocation {
                city: destination.to_string(),
                address: format!("789 Ocean View, {destination}"),
                coordinates: [0.0, 0.0],
            },
            price: NightlyPrice::usd(self.values.price(90, 120)),
            images: vec!["https://images.unsplash.com/photo-1522708323590-d24dbb6b0267".to_string()],
            rating: self.values.rating_from(4.2),
            review_count: self.values.review_count(40, 150),
            amenities: strings(&["WiFi", "Kitchen", "Washer/Dryer", "Workspace", "Self Check-in"]),
            description: format!("Beautiful and modern apartment in {destination}."),
            source: AIRBNB.source.to_string(),
            property_type: "Apartment".to_string(),
            vacation_styles: strings(&["Digital Nomad", "City"]),
            rooms: Vec::new(),
        }
    }

    fn studio(&self, destination: &str) -> Property {
        Property {
            id: AIRBNB.listing_id(&self.values.id_token()),
            name: format!("Cozy {destination} Studio"),
            location: PropertyLocation {
                city: destination.to_string(),
                address: format!("101 Downtown Ave, {destination}"),
                coordinates: [0.0, 0.0],
            },
            price: NightlyPrice::usd(self.values.price(60, 80)),
            images: vec!["https://images.unsplash.com/photo-1502672260266-1c1ef2d93688".to_string()],
            rating: self.values.rating_from(4.0),
            review_count: self.values.review_count(30, 120),
            amenities: strings(&["WiFi", "Kitchen", "Air Conditioning", "TV"]),
            description: format!("Cozy and affordable studio in {destination}."),
            source: AIRBNB.source.to_string(),
            property_type: "Studio".to_string(),
            vacation_styles: strings(&["Budget", "Solo Traveler"]),
            rooms: Vec::new(),
        }
    }
}

pub(super) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[async_trait]
impl PropertyProvider for AirbnbProvider {
    fn source_name(&self) -> &'static str {
        AIRBNB.source
    }

    async fn search(&self, query: &ProviderQuery) -> Result<Vec<Property>, ProviderError> {
        let destination = query.destination.as_str();
        Ok([self.apartment(destination), self.studio(destination)]
            .into_iter()
            .map(|listing| enforce_invariants(listing, destination, &self.values))
            .collect())
    }
}
