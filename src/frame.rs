use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

// Frames longer than this (tab in background, debugger pause) count as this long.
const MAX_FRAME_DT_SEC: f32 = 0.25;

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A requestAnimationFrame loop that re-arms itself every frame until cancelled.
pub struct AnimationLoop {
    tick: TickSlot,
    pending: Rc<Cell<Option<i32>>>,
}

impl AnimationLoop {
    /// Start calling `body(dt_sec)` once per animation frame.
    pub fn start(mut body: impl FnMut(f32) + 'static) -> Self {
        let tick: TickSlot = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None::<i32>));

        let tick_clone = tick.clone();
        let pending_tick = pending.clone();
        let mut last = Instant::now();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            pending_tick.set(None);
            let now = Instant::now();
            let dt = (now - last).as_secs_f32().min(MAX_FRAME_DT_SEC);
            last = now;
            body(dt);
            // `cancel` empties the slot; then the loop simply stops re-arming.
            if let Some(cb) = tick_clone.borrow().as_ref() {
                pending_tick.set(request_frame(cb.as_ref().unchecked_ref()));
            }
        }) as Box<dyn FnMut()>));

        if let Some(cb) = tick.borrow().as_ref() {
            pending.set(request_frame(cb.as_ref().unchecked_ref()));
        }
        Self { tick, pending }
    }

    /// Cancel the scheduled callback and release the closure.
    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            cancel_frame(id);
        }
        // Breaks the closure -> slot reference cycle.
        drop(self.tick.borrow_mut().take());
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `f` once on the next animation frame. Returns the request id.
pub fn request_once(f: impl FnOnce() + 'static) -> Option<i32> {
    let cb = Closure::once_into_js(f);
    request_frame(cb.unchecked_ref())
}

fn request_frame(cb: &js_sys::Function) -> Option<i32> {
    let w = web::window()?;
    match w.request_animation_frame(cb) {
        Ok(id) => Some(id),
        Err(e) => {
            log::error!("[frame] requestAnimationFrame failed: {:?}", e);
            None
        }
    }
}

pub fn cancel_frame(id: i32) {
    if let Some(w) = web::window() {
        _ = w.cancel_animation_frame(id);
    }
}
