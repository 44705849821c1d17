pub mod commands;
pub mod config;
pub mod main_lib;

pub use main_lib::{build_state, init_tracing, AppState};
