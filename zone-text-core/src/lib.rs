//! Generic text primitives used by config generators: placeholder template
//! rendering and create/append file writing.

pub mod template;
pub mod writer;

pub use template::{render, Fields, RenderError};
pub use writer::{write_text, WriteError, WriteMode};
