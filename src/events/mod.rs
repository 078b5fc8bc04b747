pub mod listener;
pub mod pointer;
pub mod scroll;

pub use listener::EventListener;
pub use pointer::wire_cursor;
pub use scroll::{JsScrollSource, ScrollSource, Subscription, WindowScroll};
