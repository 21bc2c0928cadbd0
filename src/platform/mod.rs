//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (lap timing)
//! - Logging setup
//! - The wasm32 host binding

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Install the platform logger (console on web, env_logger natively)
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        log::warn!("Console logger not installed: {e}");
    }
}

/// Install the platform logger (console on web, env_logger natively)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    if let Err(e) =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init()
    {
        log::warn!("env_logger not installed: {e}");
    }
}
