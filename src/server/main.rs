//! HTTP server for mobile network coverage lookups.
//!
//! Geocodes an address through the Base Adresse Nationale and reports which
//! operators offer 2G/3G/4G within 100m of it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use netcover::config::Config;
use netcover::dataset::ValidationReport;
use netcover::geocoder::{BanGeocoder, Geocoder};
use netcover::{
    coverage_for_address, AddressCoverageError, CoverageQueryResult, CoverageResolver,
    DatasetStore, GlobalPoint,
};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Mobile network coverage API server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Site dataset CSV (overrides config)
    #[arg(long)]
    dataset: Option<PathBuf>,
}

/// Application state shared across handlers
struct AppState {
    resolver: CoverageResolver,
    geocoder: Box<dyn Geocoder>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }

    info!("Netcover Coverage Server");
    info!("Loading site dataset from {}", config.dataset.path.display());

    let store = DatasetStore::open(&config.dataset.path).context("Failed to load site dataset")?;
    info!("Dataset ready with {} sites", store.snapshot().len());

    let geocoder = BanGeocoder::new(&config.geocoder).context("Failed to set up geocoder")?;

    let state = Arc::new(AppState {
        resolver: CoverageResolver::new(Arc::new(store), config.dataset.aggregation),
        geocoder: Box::new(geocoder),
    });

    // Build router
    let app = Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/coverage", get(coverage_handler))
        .route("/coverage/point", get(point_handler))
        .route("/dataset/reload", post(reload_handler))
        .layer(cors_layer(&config.server.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, detail: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
}

/// Welcome message
async fn home_handler() -> Json<MessageResponse> {
    info!("Welcome message returned");
    Json(MessageResponse {
        message: "Welcome to mobile network coverage API",
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    sites: usize,
    loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let dataset = state.resolver.store().snapshot();

    Json(HealthResponse {
        status: if dataset.is_empty() { "degraded" } else { "ok" },
        sites: dataset.len(),
        loaded_at: dataset.loaded_at(),
    })
}

#[derive(Deserialize)]
struct CoverageQueryParams {
    /// Free-form postal address
    address: String,
}

/// Coverage for a postal address
async fn coverage_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CoverageQueryParams>,
) -> Result<Json<CoverageQueryResult>, ApiError> {
    let address = params.address.trim();
    if address.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Address must not be empty"));
    }

    coverage_for_address(state.geocoder.as_ref(), &state.resolver, address)
        .await
        .map(Json)
        .map_err(|e| match e {
            AddressCoverageError::NoCoverageFound => api_error(StatusCode::NOT_FOUND, e),
            AddressCoverageError::GeocodeUnavailable | AddressCoverageError::Coordinates(_) => {
                api_error(StatusCode::BAD_REQUEST, e)
            }
        })
}

#[derive(Deserialize)]
struct PointQueryParams {
    lat: f64,
    lon: f64,
}

/// Coverage for WGS84 coordinates, skipping geocoding
async fn point_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PointQueryParams>,
) -> Result<Json<CoverageQueryResult>, ApiError> {
    let point = GlobalPoint::new(params.lon, params.lat)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    let coverage = state
        .resolver
        .resolve(point)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    if coverage.is_empty() {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            AddressCoverageError::NoCoverageFound,
        ));
    }
    Ok(Json(coverage))
}

/// Reload the dataset from disk, swapping it in only once fully validated
async fn reload_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ValidationReport>, ApiError> {
    let store = Arc::clone(state.resolver.store());

    let reloaded = tokio::task::spawn_blocking(move || store.reload())
        .await
        .map_err(|e| {
            error!("Dataset reload task failed: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        })?
        .map_err(|e| {
            error!("Dataset reload failed: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        })?;

    Ok(Json(*reloaded.report()))
}
