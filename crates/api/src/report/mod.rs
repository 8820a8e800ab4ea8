//! Station analysis report: roster by activity, the most active station's
//! temperature statistics and a histogram of its last year of observations.

mod histogram;

pub use histogram::{ChartRenderer, Histogram, HistogramSpec, PngHistogramRenderer, RenderError};

use log::debug;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    db::{self, ClimateData, MeasurementFilter, StationActivity, TemperatureStats, TobsReading},
    derived::reference_date,
};

pub const HISTOGRAM_BINS: usize = 12;
pub const SAMPLE_ROWS: usize = 5;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to load climate data: {0}")]
    Data(#[from] db::Error),
    #[error("Failed to render histogram: {0}")]
    Render(#[from] RenderError),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct StationAnalysis {
    pub station_count: i64,
    pub stations_by_activity: Vec<StationActivity>,
    pub most_active_station: MostActiveStation,
    /// First rows of the most active station's last 12 months
    pub tobs_data_sample: Vec<TobsReading>,
    /// `data:image/png;base64,...` URI of the temperature histogram
    pub plot: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct MostActiveStation {
    pub id: String,
    pub name: String,
    pub observation_count: i64,
    pub temperature_stats: TemperatureStats,
}

pub async fn build_station_analysis(
    db: &dyn ClimateData,
    renderer: &dyn ChartRenderer,
) -> Result<StationAnalysis, Error> {
    let station_count = db.station_count().await?;
    let stations_by_activity = db.station_activity().await?;

    let most_active = stations_by_activity
        .first()
        .cloned()
        .ok_or(db::Error::EmptyDataset)?;
    debug!(
        "most active station {} with {} observations",
        most_active.station_id, most_active.observation_count
    );

    let temperature_stats = db
        .temperature_stats(&MeasurementFilter::for_station(&most_active.station_id))
        .await?
        .with_rounded_avg();

    let since = reference_date(db).await?;
    let tobs_data: Vec<TobsReading> = db
        .measurements(&MeasurementFilter::for_station(&most_active.station_id).with_start(since))
        .await?
        .into_iter()
        .map(TobsReading::from)
        .collect();

    let samples: Vec<f64> = tobs_data.iter().filter_map(|reading| reading.tobs).collect();
    let spec = HistogramSpec {
        bins: HISTOGRAM_BINS,
        title: format!("Temperature Observations for Station {}", most_active.station_id),
        x_label: "Temperature (F)".to_string(),
        y_label: "Frequency".to_string(),
    };
    let plot = renderer.histogram(&samples, &spec)?;

    Ok(StationAnalysis {
        station_count,
        stations_by_activity,
        most_active_station: MostActiveStation {
            id: most_active.station_id,
            name: most_active.name,
            observation_count: most_active.observation_count,
            temperature_stats,
        },
        tobs_data_sample: tobs_data.into_iter().take(SAMPLE_ROWS).collect(),
        plot: format!("data:image/png;base64,{}", plot),
    })
}
