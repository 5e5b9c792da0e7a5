use anyhow::{Context, Result};
use clap::Parser;
use listing_search::models::{Operation, PropertyType};
use listing_search::search::{translate, url_state, PageRequest, RentalMode, SearchFilters};
use listing_search::store::{self, JsonFileStore};
use listing_search::{DetailState, HttpPropertyClient, SearchConfig, SearchSession};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Search rental and sale listings from the command line
#[derive(Parser, Debug)]
#[command(name = "listing-search", version)]
struct Cli {
    /// Search box text, e.g. "departamento en miraflores"
    text: Vec<String>,

    /// rent or sale
    #[arg(long, value_parser = parse_operation)]
    operation: Option<Operation>,

    /// apartment, house, room, studio, office, commercial or land
    #[arg(long = "type", value_parser = parse_property_type)]
    property_type: Option<PropertyType>,

    /// traditional, shared, coliving or private
    #[arg(long, value_parser = parse_rental_mode)]
    rental_mode: Option<RentalMode>,

    #[arg(long)]
    min_price: Option<f64>,

    #[arg(long)]
    max_price: Option<f64>,

    /// Minimum bedrooms
    #[arg(long)]
    bedrooms: Option<u32>,

    /// Minimum bathrooms
    #[arg(long)]
    bathrooms: Option<u32>,

    #[arg(long)]
    furnished: Option<bool>,

    #[arg(long)]
    pet_friendly: Option<bool>,

    /// Only verified listings
    #[arg(long)]
    verified: Option<bool>,

    /// Only listings that can be rented as short stays
    #[arg(long)]
    airbnb: bool,

    /// Required amenity (repeatable)
    #[arg(long = "amenity")]
    amenities: Vec<String>,

    /// Restore filters from a shared URL query string instead
    #[arg(long, conflicts_with = "text")]
    from_url: Option<String>,

    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Results per page (defaults to the configured page_limit)
    #[arg(long)]
    limit: Option<u32>,

    /// Print the translated query without calling the API
    #[arg(long)]
    dry_run: bool,

    /// Show a single listing by id or slug
    #[arg(long)]
    detail: Option<String>,

    /// Write the results as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Configuration file (defaults to ~/.listing-search/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_operation(value: &str) -> Result<Operation, String> {
    Operation::parse(value).ok_or_else(|| format!("unknown operation '{}'", value))
}

fn parse_property_type(value: &str) -> Result<PropertyType, String> {
    PropertyType::parse(value).ok_or_else(|| format!("unknown property type '{}'", value))
}

fn parse_rental_mode(value: &str) -> Result<RentalMode, String> {
    RentalMode::parse(value).ok_or_else(|| format!("unknown rental mode '{}'", value))
}

impl Cli {
    fn has_filters(&self) -> bool {
        !self.text.is_empty()
            || self.from_url.is_some()
            || self.operation.is_some()
            || self.property_type.is_some()
            || self.rental_mode.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.bedrooms.is_some()
            || self.bathrooms.is_some()
            || self.furnished.is_some()
            || self.pet_friendly.is_some()
            || self.verified.is_some()
            || self.airbnb
            || !self.amenities.is_empty()
    }

    fn filters(&self) -> SearchFilters {
        if let Some(query) = &self.from_url {
            return url_state::from_query_string(query);
        }

        let text = self.text.join(" ");
        SearchFilters {
            location: (!text.trim().is_empty()).then_some(text),
            property_type: self.property_type,
            operation: self.operation,
            min_price: self.min_price,
            max_price: self.max_price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            furnished: self.furnished,
            pet_friendly: self.pet_friendly,
            verified: self.verified,
            rental_mode: self.rental_mode,
            airbnb_eligible: self.airbnb.then_some(true),
            amenities: self.amenities.clone(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = SearchConfig::new(cli.config.as_deref())?;
    let limit = cli.limit.unwrap_or(config.page_limit);

    let state = Arc::new(
        JsonFileStore::open(config.state_path()).context("Failed to open state file")?,
    );
    let client =
        Arc::new(HttpPropertyClient::from_config(&config).context("Failed to create HTTP client")?);
    let session = SearchSession::new(
        client,
        state.clone(),
        Duration::from_millis(config.debounce_ms),
        limit,
    );

    if let Some(id) = &cli.detail {
        return show_detail(&session, id).await;
    }

    // Without any filter arguments, repeat the last search
    if cli.has_filters() {
        session.set_filters(cli.filters()).await;
    } else {
        info!("No filters given, reusing the last search");
    }

    let filters = session.filters().await;
    let params = translate(&filters, PageRequest::new(cli.page, limit));
    let share = session.share_query().await;

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&params)?);
        println!("Share: ?{}", share);
        return Ok(());
    }

    info!("🏠 Listing Search against {}", config.api_base_url);
    let count = session.search_now(cli.page).await;
    let results = session.results().await;

    info!("\n✅ Found {} properties\n", count);

    for (i, property) in results.list_items().iter().enumerate() {
        println!(
            "{}. {} ({} {})",
            i + 1,
            property.title,
            property.price,
            property.currency
        );
        if let (Some(bedrooms), Some(bathrooms)) = (property.bedrooms, property.bathrooms) {
            println!("   {} bedrooms, {} bathrooms", bedrooms, bathrooms);
        }
        if let Some(rating) = property.rating {
            println!("   Rating: {:.1}", rating);
        }
        if property.is_verified {
            println!("   Verified");
        }
        println!("   ID: {}", property.route_key());
        println!();
    }

    match results.viewport() {
        Some(viewport) => println!(
            "Map: center ({:.5}, {:.5}) zoom {} · {} markers",
            viewport.center.latitude,
            viewport.center.longitude,
            viewport.zoom,
            results.markers().len()
        ),
        None => println!("Map: no listings with coordinates"),
    }
    println!("Share: ?{}", share);

    match store::load(state.as_ref(), store::CONTACT_SETTINGS) {
        Ok(Some(contact)) => {
            if let Some(whatsapp) = contact.whatsapp.or(contact.phone) {
                println!("Contact preference: {}", whatsapp);
            }
        }
        Ok(None) => {}
        Err(e) => warn!("Could not read contact settings: {}", e),
    }

    if let Some(path) = &cli.output {
        let json = serde_json::to_string_pretty(results.results())?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("💾 Saved {} properties to {}", count, path.display());
    }

    Ok(())
}

async fn show_detail(session: &SearchSession, id: &str) -> Result<()> {
    match session.open_property(id).await {
        DetailState::Loaded(property) => {
            println!("{}", serde_json::to_string_pretty(&property)?);
        }
        state => {
            println!("{}", state.message().unwrap_or_default());
            if let Some(query) = state.back_to_search() {
                println!("Back to search: ?{}", query);
            }
        }
    }
    Ok(())
}
