use crate::core::{FrameSet, LoadState, PreloadTracker};
use crate::dom::js_err;
use fnv::FnvHashMap;
use js_sys::{Array, Promise};
use smallvec::SmallVec;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Frames that finished loading, keyed by 1-based index. Keeping the
/// elements alive keeps the decoded images in the browser cache.
pub type FrameCache = FnvHashMap<u32, web::HtmlImageElement>;

type Batch = SmallVec<[(u32, web::HtmlImageElement, Promise); 20]>;

/// Start fetching `url`. The promise resolves to `true` on load and `false`
/// on error; it never rejects.
fn load_image(url: &str) -> anyhow::Result<(web::HtmlImageElement, Promise)> {
    let img = web::HtmlImageElement::new().map_err(js_err)?;
    let target = img.clone();
    let promise = Promise::new(&mut |resolve, _reject| {
        let on_error = resolve.clone();
        let onload = Closure::once_into_js(move || {
            _ = resolve.call1(&JsValue::NULL, &JsValue::TRUE);
        });
        let onerror = Closure::once_into_js(move || {
            _ = on_error.call1(&JsValue::NULL, &JsValue::FALSE);
        });
        target.set_onload(Some(onload.unchecked_ref()));
        target.set_onerror(Some(onerror.unchecked_ref()));
    });
    img.set_src(url);
    Ok((img, promise))
}

/// Load every frame in batches of `batch_size`, awaiting each batch as a
/// whole before starting the next.
///
/// `on_batch` runs after each batch with the indices that loaded and the new
/// state; the last call carries [`LoadState::Ready`]. Frames that fail are
/// skipped. Returns `None` if `cancelled` was set between batches; fetches
/// already in flight are left to finish and their results are dropped.
pub async fn preload(
    frames: &FrameSet,
    batch_size: u32,
    cancelled: Rc<Cell<bool>>,
    mut on_batch: impl FnMut(&[u32], LoadState),
) -> anyhow::Result<Option<FrameCache>> {
    let mut tracker = PreloadTracker::new(frames.count(), batch_size);
    let total = tracker.total_batches();
    let mut cache = FrameCache::default();

    for (n, range) in frames.batches(batch_size).enumerate() {
        if cancelled.get() {
            return Ok(None);
        }
        let mut batch = Batch::new();
        for i in range {
            let Some(url) = frames.url(i) else { continue };
            let (img, promise) = load_image(&url)?;
            batch.push((i, img, promise));
        }

        let all = Promise::all(&batch.iter().map(|(_, _, p)| p.clone()).collect::<Array>());
        let results = JsFuture::from(all).await.map_err(js_err)?;
        if cancelled.get() {
            return Ok(None);
        }
        let results: Array = results.unchecked_into();

        let mut loaded: SmallVec<[u32; 20]> = SmallVec::new();
        for (k, (i, img, _)) in batch.into_iter().enumerate() {
            if results.get(k as u32).as_bool().unwrap_or(false) {
                loaded.push(i);
                cache.insert(i, img);
            } else {
                log::debug!("[preload] frame {} failed; leaving a gap", i);
            }
        }

        let state = tracker.complete_batch();
        log::debug!(
            "[preload] batch {}/{} done ({}%)",
            n + 1,
            total,
            state.progress()
        );
        on_batch(&loaded, state);
    }

    log::info!(
        "[preload] {} of {} frames ready",
        cache.len(),
        frames.count()
    );
    Ok(Some(cache))
}
