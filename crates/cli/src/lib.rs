pub mod args;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod selector;
pub mod state;
