//! A single-window multimedia shell: one image, one line of text, a looping
//! music track toggled with `P` and a sound effect fired with `S`.

pub mod assets;
pub mod audio;
pub mod config;
mod context;
pub mod error;
pub mod input;
pub mod lifecycle;
pub mod render;
pub mod shell;
pub mod text;

pub use config::Config;
pub use context::ShellContext;
pub use error::{Result, ShellError};
