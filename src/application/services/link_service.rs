//! Short link allocation service.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ShortenerSettings;
use crate::domain::entities::ShortLink;
use crate::domain::repositories::KeyValueStore;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, is_reserved, validate_custom_code};
use crate::utils::domain_guard::{enforce_scheme, is_allowed};
use crate::utils::url_validator::validate_target_url;

/// Upper bound on requested link lifetimes (ten years).
pub const MAX_EXPIRY_HOURS: u64 = 10 * 365 * 24;

/// Input for creating a short link.
#[derive(Debug, Clone, Default)]
pub struct NewShortLink {
    pub url: String,
    /// Caller-chosen code; empty means "generate one".
    pub custom_code: Option<String>,
    /// Lifetime in hours; zero means "use the default".
    pub expiry_hours: Option<u64>,
}

/// Service that allocates codes and commits code to URL mappings.
///
/// # Allocation
///
/// - Custom codes are used verbatim after validation; a taken custom code is
///   [`AppError::ShortInUse`]
/// - Generated codes are 6 random characters; a collision draws a new code,
///   up to `max_code_attempts` times, then fails with
///   [`AppError::AllocationExhausted`]
///
/// The existence check and the write are one atomic `SET NX`, so two
/// concurrent requests can never both claim the same code.
pub struct LinkService {
    store: Arc<dyn KeyValueStore>,
    domain: String,
    default_expiry_hours: u64,
    max_code_attempts: usize,
}

impl LinkService {
    /// Creates a link service over the links partition.
    pub fn new(store: Arc<dyn KeyValueStore>, settings: &ShortenerSettings) -> Self {
        Self {
            store,
            domain: settings.domain.clone(),
            default_expiry_hours: settings.default_expiry_hours,
            max_code_attempts: settings.max_code_attempts,
        }
    }

    /// Validates the request and stores a new short link.
    ///
    /// # Steps
    ///
    /// 1. Target must be a valid web address
    /// 2. Target must not point at the service's own domain
    /// 3. Target gets an `http://` scheme if it has none
    /// 4. Code is allocated and committed with the requested TTL
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] - target URL is invalid
    /// - [`AppError::SelfReferential`] - target is the service's own domain
    /// - [`AppError::InvalidShort`] - custom code is invalid
    /// - [`AppError::ShortInUse`] - custom code is taken
    /// - [`AppError::AllocationExhausted`] - every generated code collided
    /// - [`AppError::Unavailable`] - store failure
    pub async fn create_short_link(&self, request: NewShortLink) -> Result<ShortLink, AppError> {
        validate_target_url(&request.url).map_err(|e| {
            debug!(url = %request.url, "Rejected target URL: {}", e);
            AppError::InvalidUrl
        })?;

        if !is_allowed(&request.url, &self.domain) {
            return Err(AppError::SelfReferential);
        }

        let target_url = enforce_scheme(&request.url);

        let expiry_hours = match request.expiry_hours {
            None | Some(0) => self.default_expiry_hours,
            Some(hours) => hours.min(MAX_EXPIRY_HOURS),
        };

        let link = match request.custom_code.filter(|code| !code.is_empty()) {
            Some(code) => {
                validate_custom_code(&code)?;

                let link = ShortLink::new(code, target_url, expiry_hours);
                if !self.commit(&link).await? {
                    return Err(AppError::ShortInUse);
                }
                link
            }
            None => {
                self.commit_generated(target_url, expiry_hours, generate_code)
                    .await?
            }
        };

        info!(
            code = %link.code,
            expiry_hours = link.expiry_hours,
            "Short link created"
        );

        Ok(link)
    }

    /// Public short form of `link` on this service's domain.
    pub fn short_url(&self, link: &ShortLink) -> String {
        link.short_url(&self.domain)
    }

    /// Checks if the links partition answers.
    pub async fn health_check(&self) -> bool {
        self.store.ping().await
    }

    /// Draws codes from `next_code` until one is free. Reserved names are
    /// skipped and count as an attempt.
    async fn commit_generated(
        &self,
        target_url: String,
        expiry_hours: u64,
        mut next_code: impl FnMut() -> String + Send,
    ) -> Result<ShortLink, AppError> {
        for attempt in 1..=self.max_code_attempts {
            let code = next_code();
            if is_reserved(&code) {
                debug!(attempt, code = %code, "Generated reserved short code");
                continue;
            }

            let link = ShortLink::new(code, target_url.clone(), expiry_hours);

            if self.commit(&link).await? {
                return Ok(link);
            }

            warn!(attempt, code = %link.code, "Generated short code collided");
        }

        Err(AppError::AllocationExhausted {
            attempts: self.max_code_attempts,
        })
    }

    /// Writes the mapping unless the code is taken.
    async fn commit(&self, link: &ShortLink) -> Result<bool, AppError> {
        self.store
            .set_if_absent(&link.code, &link.target_url, link.ttl())
            .await
            .map_err(AppError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockKeyValueStore, StoreError};
    use crate::infrastructure::store::MemoryStore;
    use crate::utils::code_generator::CODE_LENGTH;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn settings() -> ShortenerSettings {
        ShortenerSettings::new("short.ly")
    }

    fn request(url: &str) -> NewShortLink {
        NewShortLink {
            url: url.to_string(),
            ..Default::default()
        }
    }

    fn memory_service() -> (LinkService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (LinkService::new(store.clone(), &settings()), store)
    }

    #[tokio::test]
    async fn test_create_generates_code_and_stores_url() {
        let (service, store) = memory_service();

        let link = service
            .create_short_link(request("https://example.com/page"))
            .await
            .unwrap();

        assert_eq!(link.code.len(), CODE_LENGTH);
        assert_eq!(link.target_url, "https://example.com/page");
        assert_eq!(link.expiry_hours, 24);
        assert_eq!(
            store.get(&link.code).await.unwrap().as_deref(),
            Some("https://example.com/page")
        );
        assert_eq!(
            service.short_url(&link),
            format!("short.ly/{}", link.code)
        );
    }

    #[tokio::test]
    async fn test_create_enforces_scheme() {
        let (service, _) = memory_service();

        let link = service
            .create_short_link(request("example.com/page"))
            .await
            .unwrap();

        assert_eq!(link.target_url, "http://example.com/page");
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_applies_requested_expiry() {
        let (service, store) = memory_service();

        let link = service
            .create_short_link(NewShortLink {
                expiry_hours: Some(1),
                ..request("https://example.com")
            })
            .await
            .unwrap();

        assert_eq!(link.expiry_hours, 1);
        assert_eq!(
            store.ttl(&link.code).await.unwrap(),
            Some(Duration::from_secs(3600))
        );
    }

    #[tokio::test]
    async fn test_zero_expiry_means_default() {
        let (service, _) = memory_service();

        let link = service
            .create_short_link(NewShortLink {
                expiry_hours: Some(0),
                ..request("https://example.com")
            })
            .await
            .unwrap();

        assert_eq!(link.expiry_hours, 24);
    }

    #[tokio::test]
    async fn test_expiry_is_capped() {
        let (service, _) = memory_service();

        let link = service
            .create_short_link(NewShortLink {
                expiry_hours: Some(u64::MAX),
                ..request("https://example.com")
            })
            .await
            .unwrap();

        assert_eq!(link.expiry_hours, MAX_EXPIRY_HOURS);
    }

    #[tokio::test]
    async fn test_create_invalid_url() {
        let (service, _) = memory_service();

        let result = service.create_short_link(request("not-a-url")).await;
        assert!(matches!(result, Err(AppError::InvalidUrl)));

        let result = service.create_short_link(request("")).await;
        assert!(matches!(result, Err(AppError::InvalidUrl)));
    }

    #[tokio::test]
    async fn test_create_self_referential() {
        let (service, _) = memory_service();

        for url in [
            "short.ly",
            "http://short.ly",
            "https://www.short.ly/abc123",
        ] {
            let result = service.create_short_link(request(url)).await;
            assert!(
                matches!(result, Err(AppError::SelfReferential)),
                "{} should be refused",
                url
            );
        }
    }

    #[tokio::test]
    async fn test_custom_code_used_verbatim() {
        let (service, _) = memory_service();

        let link = service
            .create_short_link(NewShortLink {
                custom_code: Some("Promo_2024".to_string()),
                ..request("https://example.com")
            })
            .await
            .unwrap();

        assert_eq!(link.code, "Promo_2024");
    }

    #[tokio::test]
    async fn test_empty_custom_code_generates_one() {
        let (service, _) = memory_service();

        let link = service
            .create_short_link(NewShortLink {
                custom_code: Some(String::new()),
                ..request("https://example.com")
            })
            .await
            .unwrap();

        assert_eq!(link.code.len(), CODE_LENGTH);
    }

    #[tokio::test]
    async fn test_custom_code_conflict_regardless_of_target() {
        let (service, store) = memory_service();

        service
            .create_short_link(NewShortLink {
                custom_code: Some("taken".to_string()),
                ..request("https://first.com")
            })
            .await
            .unwrap();

        let result = service
            .create_short_link(NewShortLink {
                custom_code: Some("taken".to_string()),
                ..request("https://second.com")
            })
            .await;

        assert!(matches!(result, Err(AppError::ShortInUse)));
        assert_eq!(
            store.get("taken").await.unwrap().as_deref(),
            Some("https://first.com")
        );
    }

    #[tokio::test]
    async fn test_invalid_custom_code() {
        let (service, _) = memory_service();

        let result = service
            .create_short_link(NewShortLink {
                custom_code: Some("a/b".to_string()),
                ..request("https://example.com")
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidShort)));
    }

    #[tokio::test]
    async fn test_generated_code_collision_retries() {
        let mut store = MockKeyValueStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        store
            .expect_set_if_absent()
            .times(3)
            .returning(move |_, _, _| Ok(counter.fetch_add(1, Ordering::SeqCst) == 2));

        let service = LinkService::new(Arc::new(store), &settings());

        let link = service
            .create_short_link(request("https://example.com"))
            .await
            .unwrap();

        assert_eq!(link.code.len(), CODE_LENGTH);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_generated_code_collisions_exhausted() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set_if_absent()
            .times(5)
            .returning(|_, _, _| Ok(false));

        let service = LinkService::new(Arc::new(store), &settings());

        let result = service.create_short_link(request("https://example.com")).await;

        assert!(matches!(
            result,
            Err(AppError::AllocationExhausted { attempts: 5 })
        ));
    }

    #[tokio::test]
    async fn test_generated_reserved_code_is_skipped() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set_if_absent()
            .withf(|code, _, _| code == "abc123")
            .times(1)
            .returning(|_, _, _| Ok(true));

        let service = LinkService::new(Arc::new(store), &settings());
        let mut codes = vec!["abc123", "health"];

        let link = service
            .commit_generated("https://example.com".to_string(), 24, || {
                codes.pop().unwrap().to_string()
            })
            .await
            .unwrap();

        assert_eq!(link.code, "abc123");
        assert!(codes.is_empty());
    }

    #[tokio::test]
    async fn test_custom_code_is_never_retried() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set_if_absent()
            .withf(|code, url, ttl| {
                code == "mine" && url == "https://example.com" && *ttl == Duration::from_secs(86_400)
            })
            .times(1)
            .returning(|_, _, _| Ok(false));

        let service = LinkService::new(Arc::new(store), &settings());

        let result = service
            .create_short_link(NewShortLink {
                custom_code: Some("mine".to_string()),
                ..request("https://example.com")
            })
            .await;

        assert!(matches!(result, Err(AppError::ShortInUse)));
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set_if_absent()
            .times(1)
            .returning(|_, _, _| Err(StoreError::Connection("refused".to_string())));

        let service = LinkService::new(Arc::new(store), &settings());

        let result = service.create_short_link(request("https://example.com")).await;

        assert!(matches!(result, Err(AppError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_validation_happens_before_store_access() {
        let store = MockKeyValueStore::new();
        let service = LinkService::new(Arc::new(store), &settings());

        let result = service.create_short_link(request("https://short.ly")).await;

        assert!(matches!(result, Err(AppError::SelfReferential)));
    }
}
