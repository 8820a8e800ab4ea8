use crate::{
    db, index_handler, precipitation, report, routes, station_analysis_handler, stations,
    temperature_from, temperature_range, tobs, ChartRenderer, ClimateAccess, ClimateData,
    PngHistogramRenderer,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub climate_db: Arc<dyn ClimateData>,
    pub renderer: Arc<dyn ChartRenderer>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::temperature_from,
        routes::climate::climate_routes::temperature_range,
    ),
    components(
        schemas(
                db::PrecipitationReading,
                db::TobsReading,
                db::TemperatureStats,
                db::StationActivity,
                report::StationAnalysis,
                report::MostActiveStation,
            )
    ),
    tags(
        (name = "climate api", description = "a read-only RESTful api over Honolulu, Hawaii precipitation and temperature observations")
    )
)]
struct ApiDoc;

/// Opens the climate store at `database_path`; a missing file is fatal.
pub async fn build_app_state(database_path: &str) -> Result<AppState, anyhow::Error> {
    let climate_db = Arc::new(
        ClimateAccess::open(database_path)
            .await
            .map_err(|e| anyhow!("error setting up climate store: {}", e))?,
    );

    Ok(AppState {
        climate_db,
        renderer: Arc::new(PngHistogramRenderer),
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        // UI routes
        .route("/", get(index_handler))
        .route("/api/v1.0/station-analysis", get(station_analysis_handler))
        // API routes
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperature_from))
        .route("/api/v1.0/{start}/{end}", get(temperature_range))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, {} code: {}, time: {}", path, response.status().as_str(), response_time);

    response
}
