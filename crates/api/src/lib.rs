pub mod db;
pub mod derived;
pub mod report;
pub mod routes;
mod startup;
pub mod templates;
mod utils;

pub use db::{
    ClimateAccess, ClimateData, Error, Measurement, MeasurementFilter, ObservationCount,
    PrecipitationReading, Station, StationActivity, TemperatureStats, TobsReading,
};
pub use derived::{busiest_station, parse_iso_date, reference_date, year_before};
pub use report::{
    build_station_analysis, ChartRenderer, Histogram, HistogramSpec, MostActiveStation,
    PngHistogramRenderer, RenderError, StationAnalysis,
};
pub use routes::*;
pub use startup::*;
pub use utils::*;
