use maud::{html, Markup};

use crate::db::StationActivity;

/// Stations ordered by how many observations they recorded
pub fn station_roster(station_count: i64, stations: &[StationActivity]) -> Markup {
    html! {
        div class="box" {
            h2 class="title is-5 mb-2" { "Number of Stations: " (station_count) }
            h3 class="subtitle is-6 mb-3" { "Stations by Activity" }

            @if stations.is_empty() {
                p class="has-text-grey" { "No observations recorded." }
            } @else {
                div class="table-container" {
                    table class="table is-fullwidth is-striped is-hoverable" id="stations-by-activity" {
                        thead {
                            tr {
                                th { "Station" }
                                th { "ID" }
                                th class="has-text-right" { "Observations" }
                            }
                        }
                        tbody {
                            @for station in stations {
                                tr {
                                    td { (station.name) }
                                    td { code { (station.station_id) } }
                                    td class="has-text-right" { (station.observation_count) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
