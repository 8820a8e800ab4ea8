use maud::{html, Markup};

use crate::{
    report::StationAnalysis,
    templates::{
        fragments::{most_active_station, station_roster, tobs_histogram, tobs_sample},
        layouts::{base, CurrentPage, PageConfig},
    },
};

pub fn station_analysis_page(analysis: &StationAnalysis) -> Markup {
    let config = PageConfig {
        title: "Station Analysis",
        current_page: CurrentPage::StationAnalysis,
    };

    base(&config, station_analysis_content(analysis))
}

pub fn station_analysis_content(analysis: &StationAnalysis) -> Markup {
    html! {
        h2 class="title is-4" { "Station Analysis" }

        (station_roster(analysis.station_count, &analysis.stations_by_activity))

        div class="mt-4" {
            (most_active_station(&analysis.most_active_station))
        }

        div class="columns mt-4" {
            div class="column is-one-third" {
                (tobs_sample(&analysis.tobs_data_sample))
            }
            div class="column" {
                (tobs_histogram(&analysis.plot, &analysis.most_active_station.id))
            }
        }
    }
}
