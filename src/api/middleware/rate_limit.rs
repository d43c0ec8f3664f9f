//! Per-IP rate limiting using the token bucket algorithm.
//!
//! Keys come from the socket peer address, so the server must be started with
//! `into_make_service_with_connect_info::<SocketAddr>()`.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

type IpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Limiter for public link routes: 2 requests per second, burst of 100.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer() -> IpGovernorLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(100)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}

/// Stricter limiter for auth routes: 1 request per second, burst of 10.
///
/// Slows down password guessing and OTP brute force.
pub fn secure_layer() -> IpGovernorLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(1)
            .burst_size(10)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}
