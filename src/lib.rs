#![cfg(target_arch = "wasm32")]
use crate::core::{FieldParams, Palette};
use crate::events::{JsScrollSource, ScrollSource, WindowScroll};
use wasm_bindgen::prelude::*;
use web_sys as web;

mod constants;
mod core;
mod dom;
mod events;
mod field;
mod frame;
mod overlay;
mod player;
mod preload;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("portfolio-fx starting");
    Ok(())
}

#[inline]
fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

/// Mounted particle field. Call `destroy()` on unmount.
#[wasm_bindgen]
pub struct ParticleFieldHandle {
    inner: Option<field::ParticleCanvas>,
}

#[wasm_bindgen]
impl ParticleFieldHandle {
    pub fn destroy(&mut self) {
        if self.inner.take().is_some() {
            log::debug!("[field] destroyed");
        }
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.inner.as_ref().map(|f| f.is_active()).unwrap_or(false)
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.inner.as_ref().map(|f| f.particle_count()).unwrap_or(0)
    }
}

/// Mount the particle field on `<canvas id=canvas_id>`; `dark` picks the palette.
#[wasm_bindgen(js_name = mountParticleField)]
pub fn mount_particle_field(
    canvas_id: &str,
    dark: bool,
) -> Result<ParticleFieldHandle, JsValue> {
    let canvas: web::HtmlCanvasElement = dom::element_by_id(canvas_id).map_err(to_js)?;
    let palette = Palette::for_dark(dark);
    let inner =
        field::ParticleCanvas::mount(canvas, FieldParams::default(), palette).map_err(to_js)?;
    Ok(ParticleFieldHandle { inner: Some(inner) })
}

/// Mounted frame sequence. Call `destroy()` on unmount.
#[wasm_bindgen]
pub struct FrameSequenceHandle {
    inner: Option<player::FrameSequencePlayer>,
}

#[wasm_bindgen]
impl FrameSequenceHandle {
    pub fn destroy(&mut self) {
        self.inner.take();
    }

    /// Frame currently on screen, 0 before the first one is shown.
    #[wasm_bindgen(getter, js_name = currentFrame)]
    pub fn current_frame(&self) -> u32 {
        self.inner
            .as_ref()
            .and_then(|p| p.current_frame())
            .unwrap_or(0)
    }

    /// Preload progress 0..=100.
    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> u8 {
        self.inner
            .as_ref()
            .map(|p| p.load_state().progress())
            .unwrap_or(0)
    }
}

/// Mount a scroll-scrubbed frame sequence on the tall element `container_id`.
///
/// Settings come from the container's `data-frame-*` attributes. Pass the
/// page's smooth-scroll controller (anything with `on("scroll", cb)`) as
/// `scroll_controller` to follow it; `undefined`/`null` uses window scroll.
#[wasm_bindgen(js_name = mountFrameSequence)]
pub fn mount_frame_sequence(
    container_id: &str,
    scroll_controller: JsValue,
) -> Result<FrameSequenceHandle, JsValue> {
    let container: web::HtmlElement = dom::element_by_id(container_id).map_err(to_js)?;
    let config = dom::sequence_config_from(&container);
    let source: Box<dyn ScrollSource> =
        if scroll_controller.is_undefined() || scroll_controller.is_null() {
            Box::new(WindowScroll)
        } else {
            Box::new(JsScrollSource::new(scroll_controller))
        };
    let inner =
        player::FrameSequencePlayer::mount(container, config, source.as_ref()).map_err(to_js)?;
    Ok(FrameSequenceHandle { inner: Some(inner) })
}
