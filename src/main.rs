use srs_portal_glue::SearchFormConfig;
use srs_portal_glue::bindings::expose_search_page;
use srs_portal_glue::browser::{self, form, opener};
use srs_portal_glue::components::{MapWindow, MapWindowProps};
use srs_portal_glue::util::init_logging;

#[derive(PartialEq, Clone, Copy)]
enum Page {
    MapPopup,
    Search,
}

fn main() {
    init_logging();
    let document = match browser::document() {
        Ok(d) => d,
        Err(err) => {
            log::error!("cannot start: {err}");
            return;
        }
    };
    let config = browser::page_config(&document);
    let body = document.body();
    let page = match body.as_ref().and_then(|b| b.get_attribute("data-srs-page")).as_deref() {
        Some("map") => Page::MapPopup,
        _ => Page::Search,
    };

    match (page, body) {
        (Page::MapPopup, Some(body)) => {
            yew::Renderer::<MapWindow>::with_root_and_props(body.into(), MapWindowProps { config }).render();
        }
        (Page::MapPopup, None) => log::error!("map page has no body"),
        (Page::Search, _) => {
            if let Err(err) = opener::install(config) {
                log::warn!("map session unavailable: {err}");
            }
            if let Err(err) = browser::window().and_then(|w| expose_search_page(&w)) {
                log::warn!("page handlers not published: {err}");
            }
            match form::install(&document, SearchFormConfig::default()) {
                Ok(true) => {}
                Ok(false) => log::debug!("page has no search form"),
                Err(err) => log::warn!("search form not bound: {err}"),
            }
        }
    }
}
