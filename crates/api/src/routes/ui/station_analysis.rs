use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Html};
use log::error;

use crate::{
    report::{build_station_analysis, Error},
    routes::climate::climate_routes::error_response,
    templates::station_analysis_page,
    AppState,
};

/// Handler for the station analysis report (GET /api/v1.0/station-analysis)
pub async fn station_analysis_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let analysis = build_station_analysis(state.climate_db.as_ref(), state.renderer.as_ref())
        .await
        .map_err(|err| match err {
            Error::Data(err) => error_response(err),
            Error::Render(err) => {
                error!("error rendering station histogram: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to render station histogram: {}", err),
                )
            }
        })?;

    Ok(Html(station_analysis_page(&analysis).into_string()))
}
