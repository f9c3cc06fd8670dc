//! Maps raw upstream records onto [`Property`].
//!
//! Every field has a default, so a record with nothing but an id still yields a
//! complete listing. A record that is not a JSON object at all is replaced by a
//! placeholder instead of being dropped.

use serde_json::{Map, Value};

use super::domain::{ListingOrigin, NightlyPrice, Property, PropertyLocation};
use super::observe;
use super::plausible::{round_tenth, PlausibleValues, MAX_RATING};

pub const BOOKING: ListingOrigin = ListingOrigin {
    id_prefix: "booking",
    source: "booking.com",
};

pub const HOTELS: ListingOrigin = ListingOrigin {
    id_prefix: "hotels",
    source: "hotels.com",
};

pub const PLACEHOLDER_IMAGE: &str = "https://images.unsplash.com/photo-1566073771259-6a8506099945";
pub const BASELINE_AMENITIES: [&str; 3] = ["WiFi", "AC", "TV"];
pub const MAX_AMENITIES: usize = 6;
pub const DEFAULT_STYLE: &str = "Standard";
const MIN_RATING: f64 = 1.0;
const BUDGET_PRICE: f64 = 100.0;
const NEARBY_METERS: f64 = 1000.0;

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

type Record = Map<String, Value>;

pub fn normalize_booking(raw: &Value, destination: &str, values: &PlausibleValues) -> Property {
    normalize_with(BOOKING, raw, destination, values, booking_record)
}

pub fn normalize_hotels(raw: &Value, destination: &str, values: &PlausibleValues) -> Property {
    normalize_with(HOTELS, raw, destination, values, hotels_record)
}

fn normalize_with(
    origin: ListingOrigin,
    raw: &Value,
    destination: &str,
    values: &PlausibleValues,
    map: fn(&Record, &str, &PlausibleValues) -> Property,
) -> Property {
    let property = match as_record(raw) {
        Ok(record) => map(record, destination, values),
        Err(err) => {
            observe::normalization_fallback(origin.source, &err);
            placeholder(origin, destination, values)
        }
    };
    enforce_invariants(property, destination, values)
}

fn as_record(raw: &Value) -> Result<&Record, NormalizeError> {
    match raw {
        Value::Object(record) => Ok(record),
        Value::Null => Err(NormalizeError::NotAnObject("null")),
        Value::Bool(_) => Err(NormalizeError::NotAnObject("a boolean")),
        Value::Number(_) => Err(NormalizeError::NotAnObject("a number")),
        Value::String(_) => Err(NormalizeError::NotAnObject("a string")),
        Value::Array(_) => Err(NormalizeError::NotAnObject("an array")),
    }
}

/// Fully defaulted listing used when a record cannot be read.
pub fn placeholder(origin: ListingOrigin, destination: &str, values: &PlausibleValues) -> Property {
    Property {
        id: origin.listing_id(&values.id_token()),
        name: format!("Hotel in {destination}"),
        location: PropertyLocation {
            city: destination.to_string(),
            address: String::new(),
            coordinates: [0.0, 0.0],
        },
        price: NightlyPrice::usd(values.price(100, 200)),
        images: vec![PLACEHOLDER_IMAGE.to_string()],
        rating: values.coarse_rating(),
        review_count: values.review_count(50, 100),
        amenities: baseline_amenities(),
        description: format!("Stay at this hotel in {destination}"),
        source: origin.source.to_string(),
        property_type: "Hotel".to_string(),
        vacation_styles: vec![DEFAULT_STYLE.to_string()],
        rooms: Vec::new(),
    }
}

/// Applies the listing invariants: non-empty name, images and styles, at most
/// six distinct amenities, a positive price and a rating within 1..=5.
pub fn enforce_invariants(
    mut property: Property,
    destination: &str,
    values: &PlausibleValues,
) -> Property {
    if property.location.city.trim().is_empty() {
        property.location.city = destination.to_string();
    }
    if property.name.trim().is_empty() {
        property.name = format!("Hotel in {}", property.location.city);
    }

    property.images.retain(|url| !url.trim().is_empty());
    if property.images.is_empty() {
        property.images.push(PLACEHOLDER_IMAGE.to_string());
    }

    let mut amenities: Vec<String> = Vec::with_capacity(MAX_AMENITIES);
    for amenity in property.amenities.drain(..) {
        if !amenity.trim().is_empty() && !amenities.contains(&amenity) {
            amenities.push(amenity);
        }
    }
    amenities.truncate(MAX_AMENITIES);
    if amenities.is_empty() {
        amenities = baseline_amenities();
    }
    property.amenities = amenities;

    property.vacation_styles.retain(|style| !style.trim().is_empty());
    if property.vacation_styles.is_empty() {
        property.vacation_styles.push(DEFAULT_STYLE.to_string());
    }

    if !(property.price.amount.is_finite() && property.price.amount > 0.0) {
        property.price.amount = values.price(100, 200);
    }
    if property.price.currency.trim().is_empty() {
        property.price.currency = "USD".to_string();
    }

    if !(property.rating.is_finite() && property.rating > 0.0) {
        property.rating = values.coarse_rating();
    }
    property.rating = property.rating.clamp(MIN_RATING, MAX_RATING);

    property
}

fn booking_record(record: &Record, destination: &str, values: &PlausibleValues) -> Property {
    let field = |key: &str| record.get(key);

    let hotel_name = text(field("hotel_name"));
    let listed_price = positive(field("min_total_price"));
    let score = positive(field("review_score"));

    let price = listed_price
        .or_else(|| positive(pointer(record, "/price_breakdown/gross_price")))
        .unwrap_or_else(|| values.price(100, 200));

    let images = [field("main_photo_url"), field("photo_url")]
        .into_iter()
        .find_map(text)
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

    let description = text(field("unit_configuration_label")).unwrap_or_else(|| {
        format!(
            "Stay at the {} in {destination}",
            hotel_name.as_deref().unwrap_or("Hotel")
        )
    });

    Property {
        id: BOOKING.listing_id(&identifier(field("hotel_id")).unwrap_or_else(|| values.id_token())),
        name: hotel_name
            .clone()
            .unwrap_or_else(|| format!("Hotel in {destination}")),
        location: PropertyLocation {
            city: text(field("city_name")).unwrap_or_else(|| destination.to_string()),
            address: text(field("address")).unwrap_or_default(),
            coordinates: [
                number(field("latitude")).unwrap_or(0.0),
                number(field("longitude")).unwrap_or(0.0),
            ],
        },
        price: NightlyPrice {
            amount: price,
            currency: text(field("currencycode")).unwrap_or_else(|| "USD".to_string()),
            per_night: true,
        },
        images: vec![images],
        rating: score
            .map(five_point_rating)
            .unwrap_or_else(|| values.coarse_rating()),
        review_count: count(field("review_nr")).unwrap_or_else(|| values.review_count(50, 100)),
        amenities: booking_amenities(record),
        description,
        source: BOOKING.source.to_string(),
        property_type: text(field("accommodation_type_name")).unwrap_or_else(|| "Hotel".to_string()),
        vacation_styles: booking_styles(record, hotel_name.as_deref(), listed_price, score),
        rooms: Vec::new(),
    }
}

fn booking_amenities(record: &Record) -> Vec<String> {
    let mut amenities = Vec::new();
    if flag(record.get("has_free_parking")) {
        amenities.push("Free Parking".to_string());
    }
    if flag(record.get("has_swimming_pool")) {
        amenities.push("Pool".to_string());
    }
    amenities.extend(BASELINE_AMENITIES.iter().map(|a| a.to_string()));
    amenities.truncate(MAX_AMENITIES);
    amenities
}

fn booking_styles(
    record: &Record,
    hotel_name: Option<&str>,
    listed_price: Option<f64>,
    score: Option<f64>,
) -> Vec<String> {
    let mut styles = Vec::new();
    let within_reach = |key: &str| positive(record.get(key)).is_some_and(|m| m < NEARBY_METERS);
    let lowercase = |value: Option<&Value>| text(value).map(|v| v.to_lowercase());

    if flag(record.get("is_beach_front")) || within_reach("distance_to_beach") {
        styles.push("Beach");
    }
    if lowercase(record.get("district")).is_some_and(|d| d.contains("downtown"))
        || within_reach("distance_to_cc")
    {
        styles.push("City");
    }
    let resort_type = lowercase(record.get("accommodation_type_name"))
        .is_some_and(|t| t.contains("resort"));
    let resort_name = hotel_name.is_some_and(|n| n.to_lowercase().contains("resort"));
    if resort_type || resort_name {
        styles.push("Resort");
    }
    if number(record.get("class")).is_some_and(|class| class >= 4.0)
        || score.is_some_and(|s| s > 8.5)
    {
        styles.push("Luxury");
    }
    if listed_price.is_some_and(|p| p < BUDGET_PRICE) {
        styles.push("Budget");
    }

    into_styles(styles)
}

fn hotels_record(record: &Record, destination: &str, values: &PlausibleValues) -> Property {
    let name = text(record.get("name"));
    let neighborhood = text(pointer(record, "/neighborhood/name"));
    let listed_price = positive(pointer(record, "/price/lead/amount"));
    let score = positive(pointer(record, "/reviews/score"));

    let amenities = match record.get("amenities") {
        Some(Value::Array(items)) if !items.is_empty() => {
            items.iter().filter_map(|item| text(Some(item))).collect()
        }
        _ => baseline_amenities(),
    };

    let mut styles = Vec::new();
    if number(record.get("star")).is_some_and(|star| star >= 4.0) {
        styles.push("Luxury");
    }
    if neighborhood.as_deref().is_some_and(|n| {
        let n = n.to_lowercase();
        n.contains("downtown") || n.contains("center") || n.contains("centre")
    }) {
        styles.push("City");
    }
    if name
        .as_deref()
        .is_some_and(|n| n.to_lowercase().contains("resort"))
    {
        styles.push("Resort");
    }
    if listed_price.is_some_and(|p| p < BUDGET_PRICE) {
        styles.push("Budget");
    }

    Property {
        id: HOTELS.listing_id(&identifier(record.get("id")).unwrap_or_else(|| values.id_token())),
        name: name
            .clone()
            .unwrap_or_else(|| format!("Hotel in {destination}")),
        location: PropertyLocation {
            city: destination.to_string(),
            address: neighborhood.clone().unwrap_or_default(),
            coordinates: [
                number(pointer(record, "/mapMarker/latLong/latitude")).unwrap_or(0.0),
                number(pointer(record, "/mapMarker/latLong/longitude")).unwrap_or(0.0),
            ],
        },
        price: NightlyPrice {
            amount: listed_price.unwrap_or_else(|| values.price(100, 200)),
            currency: text(pointer(record, "/price/lead/currencyInfo/code"))
                .unwrap_or_else(|| "USD".to_string()),
            per_night: true,
        },
        images: vec![text(pointer(record, "/propertyImage/image/url"))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())],
        rating: score
            .map(five_point_rating)
            .unwrap_or_else(|| values.coarse_rating()),
        review_count: count(pointer(record, "/reviews/total"))
            .unwrap_or_else(|| values.review_count(50, 100)),
        amenities,
        description: text(record.get("description")).unwrap_or_else(|| {
            format!(
                "Stay at the {} in {destination}",
                name.as_deref().unwrap_or("Hotel")
            )
        }),
        source: HOTELS.source.to_string(),
        property_type: text(record.get("propertyType")).unwrap_or_else(|| "Hotel".to_string()),
        vacation_styles: into_styles(styles),
        rooms: Vec::new(),
    }
}

fn into_styles(styles: Vec<&str>) -> Vec<String> {
    if styles.is_empty() {
        vec![DEFAULT_STYLE.to_string()]
    } else {
        styles.into_iter().map(str::to_string).collect()
    }
}

fn baseline_amenities() -> Vec<String> {
    BASELINE_AMENITIES.iter().map(|a| a.to_string()).collect()
}

/// Booking and Hotels both score reviews out of 10.
fn five_point_rating(ten_point_score: f64) -> f64 {
    round_tenth((ten_point_score / 2.0).min(MAX_RATING))
}

fn pointer<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let (head, rest) = path.trim_start_matches('/').split_once('/')?;
    record.get(head)?.pointer(&format!("/{rest}"))
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(raw) => Some(raw.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(number) => Some(number.to_string()),
        other => text(Some(other)),
    }
}

/// Accepts JSON numbers and numeric strings.
fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn positive(value: Option<&Value>) -> Option<f64> {
    number(value).filter(|n| *n > 0.0)
}

fn count(value: Option<&Value>) -> Option<u32> {
    number(value)
        .filter(|n| *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32)
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(raw)) => matches!(raw.trim(), "1" | "true"),
        _ => false,
    }
}
