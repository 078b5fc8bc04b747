use super::EventListener;
use crate::dom::js_err;
use js_sys::{Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

/// Live scroll subscription. Unsubscribes when dropped.
pub struct Subscription {
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

/// Something that announces scroll position changes.
///
/// The player reads the actual position from layout; a source only says
/// when to look. Sources are handed to the player by whoever owns them.
pub trait ScrollSource {
    fn subscribe(&self, on_scroll: Box<dyn FnMut()>) -> anyhow::Result<Subscription>;
}

/// Native window scrolling.
pub struct WindowScroll;

impl ScrollSource for WindowScroll {
    fn subscribe(&self, mut on_scroll: Box<dyn FnMut()>) -> anyhow::Result<Subscription> {
        let listener = EventListener::on_window("scroll", move |_| on_scroll())?;
        Ok(Subscription::new(move || drop(listener)))
    }
}

/// A smooth-scroll controller owned by the page, e.g. a Lenis instance built
/// at the app root. Needs an `on(event, cb)` method; unsubscribes through the
/// function `on` returns, or through `off(event, cb)` if it returns nothing.
pub struct JsScrollSource {
    controller: JsValue,
}

impl JsScrollSource {
    pub fn new(controller: JsValue) -> Self {
        Self { controller }
    }
}

impl ScrollSource for JsScrollSource {
    fn subscribe(&self, mut on_scroll: Box<dyn FnMut()>) -> anyhow::Result<Subscription> {
        let on: Function = Reflect::get(&self.controller, &JsValue::from_str("on"))
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| anyhow::anyhow!("scroll controller has no `on` method"))?;
        let closure =
            Closure::wrap(Box::new(move |_ev: JsValue| on_scroll()) as Box<dyn FnMut(JsValue)>);
        let unsubscribe = on
            .call2(&self.controller, &JsValue::from_str("scroll"), closure.as_ref())
            .map_err(js_err)?;

        let controller = self.controller.clone();
        Ok(Subscription::new(move || {
            if let Some(unsub) = unsubscribe.dyn_ref::<Function>() {
                _ = unsub.call0(&controller);
            } else if let Some(off) = Reflect::get(&controller, &JsValue::from_str("off"))
                .ok()
                .and_then(|f| f.dyn_into::<Function>().ok())
            {
                _ = off.call2(&controller, &JsValue::from_str("scroll"), closure.as_ref());
            }
            drop(closure);
        }))
    }
}
