pub mod components;
pub mod fragments;
pub mod layouts;
pub mod pages;

pub use layouts::{CurrentPage, PageConfig};
pub use pages::{home_page, station_analysis::station_analysis_content, station_analysis_page};
