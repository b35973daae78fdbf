//! Terminal rendering, focus and the owning event loop.

pub mod edit_buffer;
pub mod focus;
pub mod render;
pub mod runtime;
