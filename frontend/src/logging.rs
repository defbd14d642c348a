//! Process-wide logger bootstrap.
//!
//! Library code only talks to the `log` facade; this picks the sink.

use std::sync::OnceLock;

static LOGGING_INSTALLED: OnceLock<()> = OnceLock::new();

/// Installs the logger once. Repeated calls are no-ops and never panic.
pub fn init() {
    LOGGING_INSTALLED.get_or_init(install);
}

#[cfg(target_arch = "wasm32")]
fn install() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already installed");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn install() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("logger already installed by the host");
    }
}
