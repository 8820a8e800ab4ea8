use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::error;
use std::sync::Arc;

use crate::{
    db::{Error, MeasurementFilter, PrecipitationReading, TobsReading},
    derived::{busiest_station, parse_iso_date, reference_date},
    AppState,
};

pub(crate) fn error_response(err: Error) -> (StatusCode, String) {
    match err {
        Error::MalformedDate(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        _ => {
            error!("error querying climate data: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to query climate data: {}", err),
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation for the 12 months before the latest measurement", content_type = "application/json", body = Vec<PrecipitationReading>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query precipitation")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PrecipitationReading>>, (StatusCode, String)> {
    let db = state.climate_db.as_ref();
    let since = reference_date(db).await.map_err(error_response)?;
    let readings = db
        .measurements(&MeasurementFilter::since(since))
        .await
        .map_err(error_response)?
        .into_iter()
        .map(PrecipitationReading::from)
        .collect();

    Ok(Json(readings))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station id in the dataset", content_type = "application/json", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query stations")
    ))]
pub async fn stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    let stations = state
        .climate_db
        .stations()
        .await
        .map_err(error_response)?
        .into_iter()
        .map(|station| station.station)
        .collect();

    Ok(Json(stations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations of the busiest station for the last 12 months", content_type = "application/json", body = Vec<TobsReading>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query temperature observations")
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TobsReading>>, (StatusCode, String)> {
    let db = state.climate_db.as_ref();
    let station = busiest_station(db).await.map_err(error_response)?;
    let since = reference_date(db).await.map_err(error_response)?;
    let readings = db
        .measurements(&MeasurementFilter::for_station(station).with_start(since))
        .await
        .map_err(error_response)?
        .into_iter()
        .map(TobsReading::from)
        .collect();

    Ok(Json(readings))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "Inclusive start date, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "[min, avg, max] temperature from the start date on, nulls when nothing matches", content_type = "application/json", body = Vec<Option<f64>>),
        (status = BAD_REQUEST, description = "Start date is not YYYY-MM-DD"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query temperatures")
    ))]
pub async fn temperature_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<[Option<f64>; 3]>, (StatusCode, String)> {
    parse_iso_date(&start).map_err(error_response)?;

    let stats = state
        .climate_db
        .temperature_stats(&MeasurementFilter::since(start))
        .await
        .map_err(error_response)?;

    Ok(Json(stats.to_array()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "Inclusive start date, YYYY-MM-DD"),
         ("end" = String, Path, description = "Inclusive end date, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "[min, avg, max] temperature between the dates, nulls when nothing matches", content_type = "application/json", body = Vec<Option<f64>>),
        (status = BAD_REQUEST, description = "Start or end date is not YYYY-MM-DD"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query temperatures")
    ))]
pub async fn temperature_range(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<[Option<f64>; 3]>, (StatusCode, String)> {
    parse_iso_date(&start).map_err(error_response)?;
    parse_iso_date(&end).map_err(error_response)?;

    // start after end matches no rows and yields all nulls
    let stats = state
        .climate_db
        .temperature_stats(&MeasurementFilter::since(start).with_end(end))
        .await
        .map_err(error_response)?;

    Ok(Json(stats.to_array()))
}
