//! Autocomplete demo binary
//!
//! Simulates three users at once against the in-memory catalog: one typing a
//! city name, one typing a search query, one picking route endpoints. Each
//! query prints its settled snapshot as JSON.
//!
//! Environment:
//! - `RUST_LOG`: log filter, defaults to debug for the query crates
//! - `PLACES_DEBOUNCE_MS`: debounce override for all queries
//! - `PLACES_METRICS_ADDR`: address reported for the metrics endpoint

use anyhow::Context;
use autocomplete_demo::Catalog;
use autocomplete_runtime::metrics::MetricsServer;
use places_autocomplete::{
    AutocompleteService, Directions, DirectionsOptions, DirectionsService, Fresh, Location,
    PlaceOptions, PlacePredictions, QueryBinding, QueryConfig, QueryEnvironment, QueryKind,
    QueryOptions, QueryPredictions, RouteQuery, SessionToken, TravelMode,
};
use places_autocomplete::metrics::register_query_metrics;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const KEYSTROKE_GAP: Duration = Duration::from_millis(120);
const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

async fn type_slowly<K>(
    query: &QueryBinding<K>,
    text: &str,
    options: &K::Options,
) -> anyhow::Result<()>
where
    K: QueryKind<Input = String>,
{
    for end in 1..=text.len() {
        if !text.is_char_boundary(end) {
            continue;
        }
        query.update(text[..end].to_string(), options.clone()).await?;
        tokio::time::sleep(KEYSTROKE_GAP).await;
    }
    Ok(())
}

/// Each mount connects its own vendor object to the shared catalog data
fn autocomplete_vendor(catalog: Catalog) -> impl Fn() -> Arc<dyn AutocompleteService> {
    move || -> Arc<dyn AutocompleteService> { Arc::new(catalog.clone()) }
}

fn directions_vendor(catalog: Catalog) -> impl Fn() -> Arc<dyn DirectionsService> {
    move || -> Arc<dyn DirectionsService> { Arc::new(catalog.clone()) }
}

async fn place_session(config: QueryConfig, catalog: Catalog) -> anyhow::Result<()> {
    let environment =
        QueryEnvironment::<PlacePredictions>::new(Fresh::new(autocomplete_vendor(catalog)))
            .with_config(config);
    let query = QueryBinding::mount(environment).await?;
    let options = PlaceOptions {
        session_token: Some(SessionToken::new("demo-session")),
        language: Some("en".into()),
        ..PlaceOptions::default()
    };

    type_slowly(&query, "Sea", &options).await?;
    // Pause long enough for "Sea" to dispatch, then keep typing: the answer for
    // "Sea" may arrive after the one for "Seattle" and must be ignored.
    tokio::time::sleep(Duration::from_millis(350)).await;
    type_slowly(&query, "Seattle", &options).await?;

    let snapshot = query.settled(SETTLE_TIMEOUT).await?;
    println!(
        "\n[place predictions]\n{}",
        serde_json::to_string_pretty(&snapshot)?
    );

    query.unmount().await?;
    Ok(())
}

async fn query_session(config: QueryConfig, catalog: Catalog) -> anyhow::Result<()> {
    let environment =
        QueryEnvironment::<QueryPredictions>::new(Fresh::new(autocomplete_vendor(catalog)))
            .with_config(config);
    let query = QueryBinding::mount(environment).await?;

    type_slowly(&query, "Port", &QueryOptions::default()).await?;

    let snapshot = query.settled(SETTLE_TIMEOUT).await?;
    println!(
        "\n[query predictions]\n{}",
        serde_json::to_string_pretty(&snapshot)?
    );

    query.unmount().await?;
    Ok(())
}

async fn route_session(config: QueryConfig, catalog: Catalog) -> anyhow::Result<()> {
    let environment =
        QueryEnvironment::<Directions>::new(Fresh::new(directions_vendor(catalog)))
            .with_config(config);
    let query = QueryBinding::mount(environment).await?;
    let options = DirectionsOptions {
        travel_mode: TravelMode::Driving,
        avoid_tolls: Some(true),
        ..DirectionsOptions::default()
    };

    let mut route = RouteQuery {
        origin: Some(Location::Address("Seattle, WA, USA".into())),
        destination: None,
    };
    query.update(route.clone(), options.clone()).await?;
    tokio::time::sleep(KEYSTROKE_GAP).await;

    route.destination = Some(Location::Address("Portland, OR, USA".into()));
    query.update(route, options).await?;

    let snapshot = query.settled(SETTLE_TIMEOUT).await?;
    println!(
        "\n[directions]\n{}",
        serde_json::to_string_pretty(&snapshot)?
    );

    query.unmount().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,places_autocomplete=debug,autocomplete_demo=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("PLACES_METRICS_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:9000".to_string())
        .parse()
        .context("PLACES_METRICS_ADDR must be a socket address")?;
    let mut metrics = MetricsServer::new(addr);
    metrics.start()?;
    register_query_metrics();

    let config = QueryConfig::from_env()?;
    tracing::info!(?config, "Starting autocomplete demo");

    let catalog = Catalog::default();

    let (places, queries, routes) = futures::join!(
        place_session(config, catalog.clone()),
        query_session(config, catalog.clone()),
        route_session(config, catalog),
    );

    for result in [places, queries, routes] {
        if let Err(error) = result {
            tracing::error!(%error, "Session failed");
        }
    }

    if let Some(rendered) = metrics.render() {
        println!("\n[metrics for {}]\n{rendered}", metrics.addr());
    }

    Ok(())
}
