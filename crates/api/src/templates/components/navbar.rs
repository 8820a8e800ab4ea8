use maud::{html, Markup};

use crate::templates::layouts::CurrentPage;

/// Navigation between the two HTML pages
pub fn navbar(current_page: CurrentPage) -> Markup {
    html! {
        nav class="navbar mb-4" role="navigation" aria-label="main navigation" {
            div class="navbar-menu is-active" {
                div class="navbar-start" {
                    a href="/" class=(nav_item_class(current_page, CurrentPage::Home)) {
                        span class="icon-text" {
                            span class="icon" { (home_icon()) }
                            span { "Routes" }
                        }
                    }

                    a href="/api/v1.0/station-analysis"
                      class=(nav_item_class(current_page, CurrentPage::StationAnalysis)) {
                        span class="icon-text" {
                            span class="icon" { (chart_icon()) }
                            span { "Station Analysis" }
                        }
                    }
                }
            }
        }
    }
}

fn nav_item_class(current: CurrentPage, page: CurrentPage) -> &'static str {
    if current == page {
        "navbar-item is-active"
    } else {
        "navbar-item"
    }
}

fn home_icon() -> Markup {
    html! {
        svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 24 24"
            fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" {
            path d="M3 9l9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z" {}
            polyline points="9 22 9 12 15 12 15 22" {}
        }
    }
}

fn chart_icon() -> Markup {
    html! {
        svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 24 24"
            fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" {
            line x1="18" y1="20" x2="18" y2="10" {}
            line x1="12" y1="20" x2="12" y2="4" {}
            line x1="6" y1="20" x2="6" y2="14" {}
        }
    }
}
