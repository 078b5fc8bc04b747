use crate::constants::{
    CAPTION_END_ATTR, CAPTION_SELECTOR, CAPTION_START_ATTR, FRAME_IMG_SELECTOR,
};
use crate::core::{
    Caption, FramePresenter, FrameSink, LoadState, QueueOutcome, SequenceConfig, Spring,
    SpringParams,
};
use crate::dom::{self, js_err};
use crate::events::{EventListener, ScrollSource, Subscription};
use crate::frame::{self, AnimationLoop};
use crate::overlay;
use crate::preload::{self, FrameCache};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Swaps `src` on the one persistent `<img>`; prefers the preloaded element's
/// resolved URL so the browser reuses the cached decode.
struct ImageSink<'a> {
    img: &'a web::HtmlImageElement,
    cache: &'a FrameCache,
}

impl FrameSink for ImageSink<'_> {
    fn show(&mut self, index: u32, url: &str) {
        match self.cache.get(&index) {
            Some(frame) => self.img.set_src(&frame.src()),
            None => self.img.set_src(url),
        }
    }
}

struct PlayerState {
    presenter: FramePresenter,
    spring: Spring,
    cache: FrameCache,
    last_queued: Option<f32>,
    paint_id: Option<i32>,
}

type Shared = Rc<RefCell<PlayerState>>;

/// Scroll-scrubbed image sequence mounted on a tall container.
///
/// Dropping it stops the spring loop, cancels a pending paint, removes
/// listeners and tells an unfinished preload to stop after its current batch.
pub struct FrameSequencePlayer {
    state: Shared,
    cancelled: Rc<Cell<bool>>,
    _spring_loop: AnimationLoop,
    _listeners: Vec<EventListener>,
    _scroll: Subscription,
}

impl FrameSequencePlayer {
    pub fn mount(
        container: web::HtmlElement,
        config: SequenceConfig,
        scroll: &dyn ScrollSource,
    ) -> anyhow::Result<Self> {
        let frames = config.frame_set()?;
        let img = frame_image(&container)?;
        dom::set_style(&img, "display", "none");
        let captions = collect_captions(&container);

        let raw = dom::container_scroll_progress(&container);
        let state: Shared = Rc::new(RefCell::new(PlayerState {
            presenter: FramePresenter::new(frames.clone()),
            spring: Spring::new(SpringParams::default(), raw),
            cache: FrameCache::default(),
            last_queued: None,
            paint_id: None,
        }));
        apply_captions(&captions, raw);
        overlay::show_loading(&container, 0);

        // Scroll only moves the spring target; the loop below does the rest.
        let scroll_sub = {
            let state = state.clone();
            let container = container.clone();
            scroll.subscribe(Box::new(move || {
                let raw = dom::container_scroll_progress(&container);
                state.borrow_mut().spring.set_target(raw);
            }))?
        };

        // Layout changes move the container without a scroll event.
        let on_resize = {
            let state = state.clone();
            let container = container.clone();
            let img = img.clone();
            EventListener::on_window("resize", move |_| {
                let raw = dom::container_scroll_progress(&container);
                let mut s = state.borrow_mut();
                s.spring.set_target(raw);
                let value = s.spring.value();
                queue_and_schedule(&state, &mut s, &img, value);
            })?
        };

        let spring_loop = {
            let state = state.clone();
            let img = img.clone();
            let mut shown_progress = f32::NAN;
            AnimationLoop::start(move |dt| {
                let mut s = state.borrow_mut();
                let value = s.spring.step(dt);
                if value == shown_progress {
                    return;
                }
                shown_progress = value;
                apply_captions(&captions, value);
                if s.presenter.state().is_ready() && s.last_queued != Some(value) {
                    queue_and_schedule(&state, &mut s, &img, value);
                }
            })
        };

        let cancelled = Rc::new(Cell::new(false));
        spawn_preload(
            state.clone(),
            container.clone(),
            img,
            config.batch_size,
            cancelled.clone(),
        );

        log::info!(
            "[player] mounted {} frames at {}",
            frames.count(),
            frames.url(1).unwrap_or_default()
        );
        Ok(Self {
            state,
            cancelled,
            _spring_loop: spring_loop,
            _listeners: vec![on_resize],
            _scroll: scroll_sub,
        })
    }

    pub fn current_frame(&self) -> Option<u32> {
        self.state.borrow().presenter.current()
    }

    pub fn load_state(&self) -> LoadState {
        self.state.borrow().presenter.state()
    }
}

impl Drop for FrameSequencePlayer {
    fn drop(&mut self) {
        self.cancelled.set(true);
        let mut s = self.state.borrow_mut();
        s.presenter.cancel();
        if let Some(id) = s.paint_id.take() {
            frame::cancel_frame(id);
        }
        log::debug!("[player] unmounted");
    }
}

/// Queue the frame for `progress` and, if nothing is pending yet, ask for
/// one paint callback that renders whatever is newest by then.
fn queue_and_schedule(
    shared: &Shared,
    s: &mut PlayerState,
    img: &web::HtmlImageElement,
    progress: f32,
) {
    s.last_queued = Some(progress);
    if s.presenter.queue_progress(progress) != QueueOutcome::Schedule {
        return;
    }
    let state = shared.clone();
    let img = img.clone();
    s.paint_id = frame::request_once(move || {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        s.paint_id = None;
        let mut sink = ImageSink {
            img: &img,
            cache: &s.cache,
        };
        if let Some(index) = s.presenter.flush(&mut sink) {
            log::trace!("[player] frame {}", index);
        }
    });
}

fn spawn_preload(
    state: Shared,
    container: web::HtmlElement,
    img: web::HtmlImageElement,
    batch_size: u32,
    cancelled: Rc<Cell<bool>>,
) {
    let frames = state.borrow().presenter.frames().clone();
    spawn_local(async move {
        let progress_state = state.clone();
        let progress_container = container.clone();
        let result = preload::preload(&frames, batch_size, cancelled.clone(), |loaded, load| {
            let mut s = progress_state.borrow_mut();
            for &i in loaded {
                s.presenter.mark_loaded(i);
            }
            if let LoadState::Loading { progress } = load {
                s.presenter.set_state(load);
                overlay::set_progress(&progress_container, progress);
            }
        })
        .await;

        let cache = match result {
            Ok(Some(cache)) => cache,
            Ok(None) => return,
            Err(e) => {
                log::error!("[preload] aborted: {:?}", e);
                return;
            }
        };
        if cancelled.get() {
            return;
        }

        let mut s = state.borrow_mut();
        s.cache = cache;
        s.presenter.set_state(LoadState::Ready);
        overlay::hide_loading(&container);
        dom::set_style(&img, "display", "block");

        // First sync after load: show whatever the current scroll position asks for.
        let value = s.spring.value();
        queue_and_schedule(&state, &mut s, &img, value);
    });
}

/// The container's `img[data-frame]`, created and appended if absent.
fn frame_image(container: &web::HtmlElement) -> anyhow::Result<web::HtmlImageElement> {
    if let Some(img) = dom::query::<web::HtmlImageElement>(container, FRAME_IMG_SELECTOR) {
        return Ok(img);
    }
    let img = web::HtmlImageElement::new().map_err(js_err)?;
    _ = img.set_attribute("data-frame", "");
    img.set_alt("Frame sequence");
    dom::set_style(&img, "width", "100%");
    dom::set_style(&img, "height", "100%");
    dom::set_style(&img, "object-fit", "cover");
    container.append_child(&img).map_err(js_err)?;
    Ok(img)
}

fn collect_captions(container: &web::HtmlElement) -> Vec<(web::HtmlElement, Caption)> {
    dom::query_all::<web::HtmlElement>(container, CAPTION_SELECTOR)
        .into_iter()
        .enumerate()
        .filter_map(|(i, el)| {
            let start = parse_attr(&el, CAPTION_START_ATTR)?;
            let end = parse_attr(&el, CAPTION_END_ATTR)?;
            if end <= start {
                log::warn!("[player] caption {} has an empty window; skipped", i);
                return None;
            }
            Some((el, Caption::new(i, start, end)))
        })
        .collect()
}

fn parse_attr(el: &web::HtmlElement, name: &str) -> Option<f32> {
    el.get_attribute(name)?
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
}

fn apply_captions(captions: &[(web::HtmlElement, Caption)], progress: f32) {
    for (el, caption) in captions {
        dom::set_style(el, "opacity", &format!("{:.3}", caption.opacity(progress)));
        dom::set_style(
            el,
            "transform",
            &format!("translateY({:.1}px)", caption.offset_y(progress)),
        );
    }
}
