use maud::{html, Markup};

use crate::templates::{
    fragments::route_list,
    layouts::{base, CurrentPage, PageConfig},
};

/// Landing page listing the API routes
pub fn home_page() -> Markup {
    let config = PageConfig {
        title: "Honolulu, Hawaii Climate API",
        current_page: CurrentPage::Home,
    };

    base(&config, content())
}

fn content() -> Markup {
    html! {
        h2 class="title is-4" { "Welcome to Honolulu, Hawaii Climate API!" }
        (route_list())
    }
}
