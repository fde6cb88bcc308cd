//! tailbuf-cli library - exposes modules for unit tests

pub mod commands;
pub mod error;
pub mod logging;
pub mod pump;
pub mod report;
