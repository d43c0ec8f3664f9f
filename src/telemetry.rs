//! Logging setup and application counters.
//!
//! Counters go through the `metrics` facade. No exporter is installed by this
//! crate, so they are no-ops until a recorder is registered.

use metrics::counter;
use tracing_subscriber::EnvFilter;

/// Metric names as constants for consistency.
pub mod names {
    pub const LINKS_CREATED_TOTAL: &str = "shortlink_links_created_total";
    pub const REDIRECTS_TOTAL: &str = "shortlink_redirects_total";
    pub const REGISTRATIONS_TOTAL: &str = "shortlink_registrations_total";
    pub const OTP_EMAILS_FAILED_TOTAL: &str = "shortlink_otp_emails_failed_total";
}

/// Installs the global tracing subscriber.
///
/// `log_format` is `text` or `json`; `log_level` is an `EnvFilter` directive
/// used when `RUST_LOG` is unset.
pub fn init_tracing(log_level: &str, log_format: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

pub fn record_link_created(custom: bool) {
    let kind = if custom { "custom" } else { "generated" };
    counter!(names::LINKS_CREATED_TOTAL, "code" => kind).increment(1);
}

pub fn record_redirect(cache_hit: bool) {
    let cache = if cache_hit { "hit" } else { "miss" };
    counter!(names::REDIRECTS_TOTAL, "cache" => cache).increment(1);
}

pub fn record_registration() {
    counter!(names::REGISTRATIONS_TOTAL).increment(1);
}

pub fn record_otp_email_failure() {
    counter!(names::OTP_EMAILS_FAILED_TOTAL).increment(1);
}
