use crate::core::{Cursor, FieldParams, Palette, ParticleField};
use crate::dom::{self, js_err};
use crate::events::{self, EventListener};
use crate::frame::AnimationLoop;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Pointer-reactive particle grid drawn on a full-viewport canvas.
///
/// Redraws every animation frame until dropped. A canvas without a 2D
/// context gives an inert field that draws nothing.
pub struct ParticleCanvas {
    field: Option<Rc<RefCell<ParticleField>>>,
    _loop: Option<AnimationLoop>,
    _listeners: Vec<EventListener>,
}

impl ParticleCanvas {
    pub fn mount(
        canvas: web::HtmlCanvasElement,
        params: FieldParams,
        palette: Palette,
    ) -> anyhow::Result<Self> {
        let Some(ctx) = context_2d(&canvas)? else {
            log::warn!("[field] no 2d context; particle field disabled");
            return Ok(Self {
                field: None,
                _loop: None,
                _listeners: Vec::new(),
            });
        };

        let field = Rc::new(RefCell::new(ParticleField::new(params)));
        let rng = Rc::new(RefCell::new(StdRng::from_entropy()));
        let rebuild = {
            let field = field.clone();
            let canvas = canvas.clone();
            let ctx = ctx.clone();
            move || {
                let (w, h) = dom::fit_canvas_to_viewport(&canvas, &ctx);
                let mut f = field.borrow_mut();
                f.resize(w, h, &mut *rng.borrow_mut());
                log::debug!(
                    "[field] rebuilt {} particles for {}x{}",
                    f.particles().len(),
                    w,
                    h
                );
            }
        };
        rebuild();

        let cursor = Rc::new(Cell::new(Cursor::Away));
        let mut listeners = events::wire_cursor(cursor.clone())?;
        listeners.push(EventListener::on_window("resize", move |_| rebuild())?);

        let tick_field = field.clone();
        let draw_loop = AnimationLoop::start(move |_dt| {
            let c = cursor.get();
            let mut f = tick_field.borrow_mut();
            f.tick(c);
            draw(&ctx, &f, c, &palette);
        });

        log::info!(
            "[field] mounted with {} particles",
            field.borrow().particles().len()
        );
        Ok(Self {
            field: Some(field),
            _loop: Some(draw_loop),
            _listeners: listeners,
        })
    }

    pub fn is_active(&self) -> bool {
        self.field.is_some()
    }

    pub fn particle_count(&self) -> usize {
        self.field
            .as_ref()
            .map(|f| f.borrow().particles().len())
            .unwrap_or(0)
    }
}

/// Opaque 2D context (`alpha: false`); `None` if the browser refuses one.
fn context_2d(
    canvas: &web::HtmlCanvasElement,
) -> anyhow::Result<Option<web::CanvasRenderingContext2d>> {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &JsValue::from_str("alpha"), &JsValue::FALSE)
        .map_err(js_err)?;
    let ctx = canvas
        .get_context_with_context_options("2d", &options)
        .map_err(js_err)?;
    Ok(ctx.and_then(|c| c.dyn_into::<web::CanvasRenderingContext2d>().ok()))
}

fn draw(
    ctx: &web::CanvasRenderingContext2d,
    field: &ParticleField,
    cursor: Cursor,
    palette: &Palette,
) {
    let size = field.size();
    ctx.set_fill_style(&JsValue::from_str(palette.background));
    ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);

    // All dots in one path, one fill.
    let r = field.params().radius as f64;
    ctx.set_fill_style(&JsValue::from_str(palette.dot));
    ctx.begin_path();
    for p in field.particles() {
        let (x, y) = (p.pos.x as f64, p.pos.y as f64);
        ctx.move_to(x + r, y);
        _ = ctx.arc(x, y, r, 0.0, TAU);
    }
    ctx.fill();

    if cursor.position().is_none() {
        return;
    }
    for g in field.glows(cursor, palette.glow_alpha) {
        ctx.set_fill_style(&JsValue::from_str(&palette.glow_fill(g.alpha)));
        ctx.begin_path();
        _ = ctx.arc(g.pos.x as f64, g.pos.y as f64, g.radius as f64, 0.0, TAU);
        ctx.fill();
    }
}
