use super::EventListener;
use crate::core::Cursor;
use glam::Vec2;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Track the pointer in viewport CSS pixels.
///
/// Moves anywhere on the page update `cursor`; leaving the document resets
/// it to [`Cursor::Away`]. The canvas itself has `pointer-events: none`, so
/// both listeners sit on the window/document rather than on it.
pub fn wire_cursor(cursor: Rc<Cell<Cursor>>) -> anyhow::Result<Vec<EventListener>> {
    let document = crate::dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let cursor_move = cursor.clone();
    let on_move = EventListener::on_window("pointermove", move |ev: web::Event| {
        if let Some(ev) = ev.dyn_ref::<web::MouseEvent>() {
            cursor_move.set(Cursor::At(Vec2::new(
                ev.client_x() as f32,
                ev.client_y() as f32,
            )));
        }
    })?;

    let on_leave = EventListener::new(&document, "mouseleave", move |_ev: web::Event| {
        cursor.set(Cursor::Away);
    })?;

    Ok(vec![on_move, on_leave])
}
