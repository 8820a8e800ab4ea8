use maud::{html, Markup};

use crate::db::TobsReading;

pub fn tobs_sample(readings: &[TobsReading]) -> Markup {
    html! {
        div class="box" {
            h2 class="title is-5 mb-3" { "TOBS Data Sample" }
            @if readings.is_empty() {
                p class="has-text-grey" { "No observations in the last 12 months." }
            } @else {
                ul {
                    @for reading in readings {
                        li {
                            "Date: " (reading.date) ", TOBS: "
                            @match reading.tobs {
                                Some(tobs) => { (tobs) }
                                None => { "n/a" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Inline histogram image, `plot` is a data URI
pub fn tobs_histogram(plot: &str, station_id: &str) -> Markup {
    html! {
        div class="box" {
            h2 class="title is-5 mb-3" { "TOBS Histogram" }
            figure class="image" {
                img src=(plot) alt=(format!("TOBS Histogram for Station {}", station_id));
                figcaption class="has-text-centered is-size-7 mt-2" {
                    "Temperature Observations for Station " (station_id)
                }
            }
        }
    }
}
