use chrono::NaiveDate;
use clap::Args;
use stay_search::config::AppConfig;
use stay_search::error::AppError;
use stay_search::search::domain::parse_date;
use stay_search::search::{SearchRequest, SearchResponse, SearchService};
use stay_search::telemetry;

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Free-text destination, e.g. "Bali" or "a week in Tokyo"
    #[arg(long)]
    pub(crate) destination: String,
    /// Check-in date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_in: Option<NaiveDate>,
    /// Check-out date (YYYY-MM-DD, defaults to the day after check-in)
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_out: Option<NaiveDate>,
    /// Number of guests
    #[arg(long, default_value_t = 2)]
    pub(crate) guests: u32,
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let service = SearchService::from_config(&config.providers)?;
    let request = SearchRequest {
        destination: Some(args.destination),
        check_in: args.check_in,
        check_out: args.check_out,
        guests: Some(args.guests),
    };

    let response = service.search(&request).await?;
    println!("{}", render_search(&response));
    Ok(())
}

fn render_search(response: &SearchResponse) -> String {
    let mut lines = vec![format!("Source: {}", response.source.label())];
    if let Some(count) = response.api_sources_count {
        lines.push(format!("Providers with results: {count}"));
    }
    lines.push(format!("Listings: {}", response.results.len()));
    lines.push(String::new());

    for (index, property) in response.results.iter().enumerate() {
        lines.push(format!(
            "{}. {} [{}] {:.0} {}/night, rating {:.1} ({} reviews)",
            index + 1,
            property.name,
            property.source,
            property.price.amount,
            property.price.currency,
            property.rating,
            property.review_count
        ));
        lines.push(format!(
            "   {} | {}",
            property.property_type,
            property.vacation_styles.join(", ")
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use stay_search::search::fallback::sample_listings;
    use stay_search::search::ResultSource;

    #[test]
    fn render_lists_every_result_with_source_header() {
        let results = sample_listings("Bali");
        let response = SearchResponse {
            total_results: Some(results.len()),
            results,
            source: ResultSource::Fallback,
            api_sources_count: Some(0),
        };

        let rendered = render_search(&response);
        assert!(rendered.starts_with("Source: Mock Data (fallback)"));
        assert!(rendered.contains("Providers with results: 0"));
        assert!(rendered.contains("1. Luxury Bali Resort [Mock Data] 215 USD/night, rating 4.8 (356 reviews)"));
        assert!(rendered.contains("4. Budget-Friendly Bali Apartment"));
    }
}
