pub mod api;
pub mod config;
pub mod error;
pub mod main_lib;

pub use main_lib::{assemble_state, build_state, init_tracing, AppState, Collaborators};
