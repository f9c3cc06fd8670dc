use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

use crate::config::ProviderCredential;

pub const DEFAULT_GUESTS: u32 = 2;

/// Inbound search payload as posted by the search page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub check_in: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub check_out: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lenient_guests")]
    pub guests: Option<u32>,
}

impl SearchRequest {
    pub fn for_destination(destination: impl Into<String>) -> Self {
        Self {
            destination: Some(destination.into()),
            ..Self::default()
        }
    }

    /// Trimmed destination, `None` when absent or blank.
    pub fn destination(&self) -> Option<&str> {
        self.destination
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn guests(&self) -> u32 {
        self.guests.unwrap_or(DEFAULT_GUESTS)
    }

    /// Check-in defaults to `today`; check-out defaults to the night after check-in.
    pub fn stay(&self, today: NaiveDate) -> StayDates {
        let check_in = self.check_in.unwrap_or(today);
        let check_out = self
            .check_out
            .unwrap_or_else(|| check_in + Duration::days(1));
        StayDates {
            check_in,
            check_out,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayDates {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Unreadable dates are logged and read as absent so the stay defaults apply.
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let date = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) if raw.trim().is_empty() => None,
        Some(Value::String(raw)) => match parse_date(&raw) {
            Ok(date) => Some(date),
            Err(detail) => {
                warn!(%detail, "ignoring unreadable stay date");
                None
            }
        },
        Some(other) => {
            warn!(value = %other, "ignoring non-string stay date");
            None
        }
    };
    Ok(date)
}

/// Accepts a count or a numeric string; anything else reads as absent.
fn deserialize_lenient_guests<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let guests = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(raw)) if raw.trim().is_empty() => None,
        Some(Value::String(raw)) => raw.trim().parse::<u32>().ok(),
        Some(_) => None,
    };
    Ok(guests.filter(|count| *count > 0))
}

/// Rectangular geographic filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    pub const fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }
}

/// Upstream wire form: `south,north,west,east`.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.north, self.west, self.east)
    }
}

/// Everything an adapter needs to run one search.
#[derive(Debug, Clone)]
pub struct ProviderQuery {
    pub destination: String,
    pub stay: StayDates,
    pub guests: u32,
    pub bounds: BoundingBox,
    pub credential: ProviderCredential,
}

/// Provider identity stamped onto every listing it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOrigin {
    pub id_prefix: &'static str,
    pub source: &'static str,
}

impl ListingOrigin {
    pub fn listing_id(&self, suffix: &str) -> String {
        format!("{}-{}", self.id_prefix, suffix)
    }
}

/// Canonical listing shape returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub name: String,
    pub location: PropertyLocation,
    pub price: NightlyPrice,
    pub images: Vec<String>,
    pub rating: f64,
    pub review_count: u32,
    pub amenities: Vec<String>,
    pub description: String,
    pub source: String,
    pub property_type: String,
    pub vacation_styles: Vec<String>,
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyLocation {
    pub city: String,
    pub address: String,
    /// `[latitude, longitude]`, `[0, 0]` when unknown.
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NightlyPrice {
    pub amount: f64,
    pub currency: String,
    pub per_night: bool,
}

impl NightlyPrice {
    pub fn usd(amount: f64) -> Self {
        Self {
            amount,
            currency: "USD".to_string(),
            per_night: true,
        }
    }
}

/// Room offer as rendered by the property detail view. No current provider
/// supplies room-level data, so search results always carry an empty list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    #[serde(rename = "type")]
    pub room_type: String,
    pub price: f64,
    pub description: String,
    pub beds: String,
    pub occupancy: u32,
    pub available: bool,
}

/// Where the `results` of a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Live,
    Fallback,
    Unconfigured,
}

impl ResultSource {
    pub fn label(self) -> &'static str {
        match self {
            ResultSource::Live => "Real API Data",
            ResultSource::Fallback => "Mock Data (fallback)",
            ResultSource::Unconfigured => "Mock Data (API key not configured)",
        }
    }

    pub fn is_synthetic(self) -> bool {
        !matches!(self, ResultSource::Live)
    }
}

impl Serialize for ResultSource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<Property>,
    pub source: ResultSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_sources_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        parse_date(raw).expect("valid date")
    }

    #[test]
    fn request_defaults_guests_and_dates() {
        let request: SearchRequest =
            serde_json::from_str(r#"{ "destination": "Paris" }"#).expect("request parses");
        assert_eq!(request.destination(), Some("Paris"));
        assert_eq!(request.guests(), 2);

        let stay = request.stay(date("2025-06-01"));
        assert_eq!(stay.check_in, date("2025-06-01"));
        assert_eq!(stay.check_out, date("2025-06-02"));
    }

    #[test]
    fn request_keeps_explicit_dates() {
        let request: SearchRequest = serde_json::from_str(
            r#"{ "destination": "Tokyo", "checkIn": "2025-07-10", "checkOut": "2025-07-14", "guests": 3 }"#,
        )
        .expect("request parses");
        assert_eq!(request.guests(), 3);
        let stay = request.stay(date("2025-06-01"));
        assert_eq!(stay.check_in, date("2025-07-10"));
        assert_eq!(stay.check_out, date("2025-07-14"));
    }

    #[test]
    fn blank_destination_reads_as_missing() {
        for body in [
            r#"{}"#,
            r#"{ "destination": null }"#,
            r#"{ "destination": "   " }"#,
        ] {
            let request: SearchRequest = serde_json::from_str(body).expect("request parses");
            assert_eq!(request.destination(), None, "body {body}");
        }
    }

    #[test]
    fn empty_date_strings_are_treated_as_absent() {
        let request: SearchRequest =
            serde_json::from_str(r#"{ "destination": "Bali", "checkIn": "" }"#)
                .expect("request parses");
        assert!(request.check_in.is_none());
    }

    #[test]
    fn guests_accept_numeric_strings() {
        for (body, expected) in [
            (r#"{ "destination": "Paris", "guests": "3" }"#, 3),
            (r#"{ "destination": "Paris", "guests": " 4 " }"#, 4),
            (r#"{ "destination": "Paris", "guests": 5 }"#, 5),
            (r#"{ "destination": "Paris", "guests": "many" }"#, DEFAULT_GUESTS),
            (r#"{ "destination": "Paris", "guests": "" }"#, DEFAULT_GUESTS),
            (r#"{ "destination": "Paris", "guests": -1 }"#, DEFAULT_GUESTS),
            (r#"{ "destination": "Paris", "guests": 0 }"#, DEFAULT_GUESTS),
            (r#"{ "destination": "Paris", "guests": [2] }"#, DEFAULT_GUESTS),
        ] {
            let request: SearchRequest = serde_json::from_str(body).expect("request parses");
            assert_eq!(request.guests(), expected, "body {body}");
        }
    }

    #[test]
    fn unreadable_dates_fall_back_to_defaults() {
        let request: SearchRequest = serde_json::from_str(
            r#"{ "destination": "Paris", "checkIn": "2025-10-01T00:00:00.000Z", "checkOut": 20251003 }"#,
        )
        .expect("request parses");
        assert!(request.check_in.is_none());
        assert!(request.check_out.is_none());

        let stay = request.stay(date("2025-06-01"));
        assert_eq!(stay.check_in, date("2025-06-01"));
        assert_eq!(stay.check_out, date("2025-06-02"));
    }

    #[test]
    fn room_serializes_with_detail_view_names() {
        let room = Room {
            room_type: "Deluxe Ocean View".to_string(),
            price: 215.0,
            description: "Spacious room with direct ocean views".to_string(),
            beds: "1 King Bed".to_string(),
            occupancy: 2,
            available: true,
        };
        let value = serde_json::to_value(&room).expect("serializes");
        assert_eq!(value["type"], "Deluxe Ocean View");
        assert_eq!(value["occupancy"], 2);
        assert!(value.get("roomType").is_none());
    }

    #[test]
    fn bounding_box_renders_as_upstream_bbox() {
        let bounds = BoundingBox::new(51.385064, 51.672343, -0.351486, 0.148271);
        assert_eq!(bounds.to_string(), "51.385064,51.672343,-0.351486,0.148271");
    }

    #[test]
    fn response_omits_counts_when_absent() {
        let response = SearchResponse {
            results: Vec::new(),
            source: ResultSource::Unconfigured,
            api_sources_count: None,
            total_results: None,
        };
        let value = serde_json::to_value(&response).expect("serializes");
        assert_eq!(value["source"], "Mock Data (API key not configured)");
        assert!(value.get("apiSourcesCount").is_none());
        assert!(value.get("totalResults").is_none());
    }
}
