use maud::{html, Markup};

use crate::report::MostActiveStation;

/// Most active station identity and its all-time temperature statistics
pub fn most_active_station(station: &MostActiveStation) -> Markup {
    let stats = &station.temperature_stats;
    html! {
        div class="box" {
            h2 class="title is-5 mb-3" { "Most Active Station" }
            p { "ID: " span id="most-active-id" { (station.id) } }
            p { "Name: " span id="most-active-name" { (station.name) } }
            p { "Observation Count: " (station.observation_count) }

            h3 class="subtitle is-6 mt-4 mb-2" { "Temperature Stats" }
            div class="columns is-mobile" {
                (stat_card("Min", "temp-min", stats.min))
                (stat_card("Avg", "temp-avg", stats.avg))
                (stat_card("Max", "temp-max", stats.max))
            }
        }
    }
}

fn stat_card(label: &str, id: &str, value: Option<f64>) -> Markup {
    html! {
        div class="column" {
            div class="notification is-light has-text-centered" {
                p class="title is-4 mb-1" {
                    @match value {
                        Some(v) => { span id=(id) { (v) } " F" },
                        None => { span id=(id) { "n/a" } },
                    }
                }
                p class="heading" { (label) }
            }
        }
    }
}
