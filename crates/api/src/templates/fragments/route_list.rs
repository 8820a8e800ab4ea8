use maud::{html, Markup};

/// Browsable routes, in the order they are listed on the home page
pub const LINKED_ROUTES: &[(&str, &str)] = &[
    ("Precipitation", "/api/v1.0/precipitation"),
    ("Stations", "/api/v1.0/stations"),
    ("TOBS", "/api/v1.0/tobs"),
    ("Station Analysis", "/api/v1.0/station-analysis"),
];

pub fn route_list() -> Markup {
    html! {
        div class="box" {
            h2 class="title is-5 mb-3" { "The available routes are:" }
            ul {
                @for (label, path) in LINKED_ROUTES {
                    li {
                        a href=(path) { (label) } ": " strong { (path) }
                    }
                }
                li {
                    "To retrieve the minimum, average, and maximum temperatures from a start date, use "
                    strong { "/api/v1.0/<start>" }
                    " (start date in yyyy-mm-dd format)"
                }
                li {
                    "To retrieve the minimum, average, and maximum temperatures for a start-end range, use "
                    strong { "/api/v1.0/<start>/<end>" }
                    " (start and end dates in yyyy-mm-dd format)"
                }
            }
        }
    }
}
