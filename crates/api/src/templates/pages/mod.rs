pub mod home;
pub mod station_analysis;

pub use home::home_page;
pub use station_analysis::station_analysis_page;
