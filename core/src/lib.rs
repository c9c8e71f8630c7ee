#![no_std]

extern crate alloc;

pub use color::*;
pub use config::*;
pub use coverage::*;
pub use driver::*;
pub use error::*;
pub use headless::*;
pub use history::*;
pub use render::*;
pub use types::*;
pub use walker::*;

mod color;
mod config;
mod coverage;
mod driver;
mod error;
mod headless;
mod history;
mod render;
mod types;
mod walker;
