#![warn(rust_2018_idioms, rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::missing_errors_doc,      // Internal API
    clippy::module_name_repetitions, // e.g. DispatchError in dispatch module
    clippy::must_use_candidate,      // Annotated selectively on critical APIs
    clippy::doc_markdown             // Internal API
)]

pub mod app;
pub mod dispatch;
pub mod domain;
pub mod enrich;
pub mod handler;
pub mod parser;
pub mod port;
pub mod sender;
pub mod test_support;
pub mod trigger;

// Re-export main types for easy access
pub use app::{AppError, Config};
pub use dispatch::{BatchDispatcher, DispatchError, DispatchSummary};
pub use trigger::{TriggerRouter, resolve_trigger_kind};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
