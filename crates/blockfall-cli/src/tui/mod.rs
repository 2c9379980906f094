//! Minimal frame-driven terminal runtime.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
