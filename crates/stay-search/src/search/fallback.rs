//! Fixed sample catalog served when no live data is available.

use super::domain::{NightlyPrice, Property, PropertyLocation};

pub const FALLBACK_SOURCE: &str = "Mock Data";
pub const FALLBACK_LISTING_COUNT: usize = 4;

struct Template {
    id: &'static str,
    name: &'static str,
    address: &'static str,
    coordinates: [f64; 2],
    price: f64,
    images: [&'static str; 2],
    rating: f64,
    review_count: u32,
    amenities: &'static [&'static str],
    description: &'static str,
    property_type: &'static str,
    vacation_styles: &'static [&'static str],
}

const TEMPLATES: [Template; FALLBACK_LISTING_COUNT] = [
    Template {
        id: "mock-1",
        name: "Luxury {destination} Resort",
        address: "123 Ocean Drive",
        coordinates: [8.3405, 115.092],
        price: 215.0,
        images: [
            "https://images.unsplash.com/photo-1566073771259-6a8506099945",
            "https://images.unsplash.com/photo-1582719508461-905c673771fd",
        ],
        rating: 4.8,
        review_count: 356,
        amenities: &["Pool", "WiFi", "AC", "Beach Access", "Restaurant"],
        description: "Luxury resort with stunning ocean views in {destination}. Perfect for a relaxing vacation.",
        property_type: "Resort",
        vacation_styles: &["Beach", "Relaxation", "Luxury"],
    },
    Template {
        id: "mock-2",
        name: "Downtown {destination} Boutique Hotel",
        address: "456 Main Street",
        coordinates: [8.3932, 115.1892],
        price: 175.0,
        images: [
            "https://images.unsplash.com/photo-1590490360182-c33d57733427",
            "https://images.unsplash.com/photo-1566665797739-1674de7a421a",
        ],
        rating: 4.6,
        review_count: 285,
        amenities: &["WiFi", "AC", "City View", "Restaurant", "Bar"],
        description: "Stylish boutique hotel in the heart of {destination}. Walking distance to main attractions.",
        property_type: "Hotel",
        vacation_styles: &["City Exploration", "Culture", "Nightlife"],
    },
    Template {
        id: "mock-3",
        name: "{destination} Mountain Cabin",
        address: "789 Mountain Road",
        coordinates: [8.4212, 115.2542],
        price: 120.0,
        images: [
            "https://images.unsplash.com/photo-1510798831971-661eb04b3739",
            "https://images.unsplash.com/photo-1588880331179-bc9b93a8cb5e",
        ],
        rating: 4.7,
        review_count: 192,
        amenities: &["Fireplace", "WiFi", "Mountain View", "Kitchen", "Parking"],
        description: "Charming cabin with beautiful mountain views in {destination}. Perfect for a nature retreat.",
        property_type: "Cabin",
        vacation_styles: &["Nature", "Adventure", "Romantic"],
    },
    Template {
        id: "mock-4",
        name: "Budget-Friendly {destination} Apartment",
        address: "101 Traveler Street",
        coordinates: [8.3645, 115.1524],
        price: 85.0,
        images: [
            "https://images.unsplash.com/photo-1502672260266-1c1ef2d93688",
            "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2",
        ],
        rating: 4.3,
        review_count: 167,
        amenities: &["WiFi", "Kitchen", "Washing Machine", "City Access", "Public Transport"],
        description: "Comfortable and affordable apartment in {destination}. Great for budget travelers.",
        property_type: "Apartment",
        vacation_styles: &["Budget", "Long-term", "Digital Nomad"],
    },
];

/// The sample listings for `destination`. Same input, same output.
pub fn sample_listings(destination: &str) -> Vec<Property> {
    TEMPLATES
        .iter()
        .map(|template| Property {
            id: template.id.to_string(),
            name: interpolate(template.name, destination),
            location: PropertyLocation {
                city: destination.to_string(),
                address: template.address.to_string(),
                coordinates: template.coordinates,
            },
            price: NightlyPrice::usd(template.price),
            images: strings(&template.images),
            rating: template.rating,
            review_count: template.review_count,
            amenities: strings(template.amenities),
            description: interpolate(template.description, destination),
            source: FALLBACK_SOURCE.to_string(),
            property_type: template.property_type.to_string(),
            vacation_styles: strings(template.vacation_styles),
            rooms: Vec::new(),
        })
        .collect()
}

fn interpolate(template: &str, destination: &str) -> String {
    template.replace("{destination}", destination)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
