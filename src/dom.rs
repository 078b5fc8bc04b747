use crate::constants::SEQUENCE_ATTRS;
use crate::core::{scroll_progress, SequenceConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys as web;

#[inline]
pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn element_by_id<T: JsCast>(id: &str) -> anyhow::Result<T> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let el = document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?;
    el.dyn_into::<T>()
        .map_err(|e| anyhow::anyhow!("#{} has the wrong element type: {:?}", id, e))
}

pub fn query<T: JsCast>(root: &web::Element, selector: &str) -> Option<T> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<T>().ok())
}

pub fn query_all<T: JsCast>(root: &web::Element, selector: &str) -> Vec<T> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

#[inline]
pub fn set_style(el: &web::HtmlElement, property: &str, value: &str) {
    _ = el.style().set_property(property, value);
}

/// CSS-pixel viewport size.
pub fn viewport_size() -> (f64, f64) {
    let Some(w) = web::window() else {
        return (0.0, 0.0);
    };
    let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width, height)
}

#[inline]
pub fn device_pixel_ratio() -> f64 {
    web::window()
        .map(|w| w.device_pixel_ratio())
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(1.0)
}

/// Cover the viewport: backing store in device pixels, CSS size in CSS
/// pixels, and a context transform so drawing happens in CSS pixels.
/// Returns the CSS size.
pub fn fit_canvas_to_viewport(
    canvas: &web::HtmlCanvasElement,
    ctx: &web::CanvasRenderingContext2d,
) -> (f32, f32) {
    let dpr = device_pixel_ratio();
    let (w, h) = viewport_size();
    canvas.set_width(((w * dpr) as u32).max(1));
    canvas.set_height(((h * dpr) as u32).max(1));
    _ = canvas.style().set_property("width", &format!("{}px", w));
    _ = canvas.style().set_property("height", &format!("{}px", h));
    _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    (w as f32, h as f32)
}

/// Raw 0..1 scroll progress of a tall container through the viewport.
pub fn container_scroll_progress(container: &web::Element) -> f32 {
    let rect = container.get_bounding_client_rect();
    let (_, viewport_h) = viewport_size();
    scroll_progress(rect.top(), rect.height(), viewport_h)
}

/// Defaults overridden by `data-frame-count` and friends on `container`.
pub fn sequence_config_from(container: &web::Element) -> SequenceConfig {
    let mut config = SequenceConfig::default();
    for key in SEQUENCE_ATTRS {
        if let Some(value) = container.get_attribute(&format!("data-{}", key)) {
            if let Err(e) = config.apply_attribute(key, &value) {
                log::warn!("[config] {}; keeping default", e);
            }
        }
    }
    config
}
