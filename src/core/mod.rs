mod config;
mod app_state;

pub use config::RealtimeConfig;
pub use app_state::*;
