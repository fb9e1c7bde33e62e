//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{LinkService, RateLimiter, RedirectService};
use crate::config::ShortenerSettings;
use crate::domain::repositories::KeyValueStore;

/// Services shared by all request handlers.
///
/// Cloned per request; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub rate_limiter: Arc<RateLimiter>,
    /// Key quotas by forwarding headers instead of the peer address.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires the services over the links and quota partitions.
    pub fn new(
        links: Arc<dyn KeyValueStore>,
        quotas: Arc<dyn KeyValueStore>,
        settings: &ShortenerSettings,
        behind_proxy: bool,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(links.clone(), settings)),
            redirect_service: Arc::new(RedirectService::new(links, quotas.clone())),
            rate_limiter: Arc::new(RateLimiter::new(quotas, settings)),
            behind_proxy,
        }
    }
}
