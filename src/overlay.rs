use crate::constants::{LOADING_LABEL_SELECTOR, LOADING_SELECTOR};
use crate::dom;
use web_sys as web;

// Loading indicator inside a frame-sequence container.

#[inline]
pub fn show_loading(container: &web::Element, progress: u8) {
    if let Some(el) = dom::query::<web::HtmlElement>(container, LOADING_SELECTOR) {
        _ = el.class_list().remove_1("hidden");
        // fallback for pages without a `.hidden` rule
        _ = el.style().remove_property("display");
    }
    set_progress(container, progress);
}

#[inline]
pub fn hide_loading(container: &web::Element) {
    if let Some(el) = dom::query::<web::HtmlElement>(container, LOADING_SELECTOR) {
        _ = el.class_list().add_1("hidden");
        // fallback
        dom::set_style(&el, "display", "none");
    }
}

pub fn set_progress(container: &web::Element, progress: u8) {
    if let Some(el) = container.query_selector(LOADING_LABEL_SELECTOR).ok().flatten() {
        el.set_text_content(Some(&format!("Loading {}%", progress.min(100))));
    }
}
