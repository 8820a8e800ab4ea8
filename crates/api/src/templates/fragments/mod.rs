mod route_list;
mod station_roster;
mod temperature_stats;
mod tobs_sample;

pub use route_list::{route_list, LINKED_ROUTES};
pub use station_roster::station_roster;
pub use temperature_stats::most_active_station;
pub use tobs_sample::{tobs_histogram, tobs_sample};
