//! Client-side core of the attendance tracker: paginated access to the
//! employee and attendance collections, the dashboard aggregates and the
//! form workflows built on top of them.

pub mod api;
pub mod config;
pub mod logging;
pub mod pages;
pub mod state;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use pages::dashboard::{derive_metrics, DerivedMetrics};

/// Installs logging and resolves the runtime configuration. Safe to call
/// more than once.
pub fn init() -> &'static config::ResolvedConfig {
    logging::init();
    let resolved = config::current();
    log::info!("Starting attendance client against {}", resolved.api_base_url());
    resolved
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_can_run_twice() {
        let first = super::init();
        let second = super::init();
        assert!(std::ptr::eq(first, second));
        assert!(first.api_base_url().ends_with('/'));
    }
}
