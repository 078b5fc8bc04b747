// DOM hooks shared by the mount helpers.
//
// The host page owns the markup; these selectors are the contract between
// it and the wasm side.

// Frame sequence container children
pub const FRAME_IMG_SELECTOR: &str = "img[data-frame]";
pub const LOADING_SELECTOR: &str = "[data-loading]";
pub const LOADING_LABEL_SELECTOR: &str = "[data-loading-label]";
pub const CAPTION_SELECTOR: &str = "[data-caption-start]";

// Caption window attributes (progress values in 0..1)
pub const CAPTION_START_ATTR: &str = "data-caption-start";
pub const CAPTION_END_ATTR: &str = "data-caption-end";

// Per-container overrides read into `SequenceConfig`
pub const SEQUENCE_ATTRS: [&str; 4] = ["frame-count", "frame-path", "frame-ext", "batch-size"];
