mod station_analysis;

pub use station_analysis::station_analysis_handler;
