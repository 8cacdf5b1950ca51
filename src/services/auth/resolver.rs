use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::principal::Principal;
use crate::services::auth::provider::UserRecordProvider;

/// Resolve failure.
///
/// - `NotFound`: the provider has no record for the identifier (expected outcome)
/// - `Provider`: the lookup itself failed; the provider error is kept as the source
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("user not found with email: {identifier}")]
    NotFound { identifier: String },

    #[error("user record lookup failed")]
    Provider(#[from] RepoError),
}

impl ResolveError {
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }
}

/// Contract an authentication layer depends on to turn a login identifier
/// into a principal.
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    async fn resolve(&self, identifier: &str) -> Result<Principal, ResolveError>;
}

/// Resolves principals by email through a [`UserRecordProvider`].
///
/// Stateless apart from the provider handle: one provider lookup per call,
/// no caching, no retry, no normalization of the identifier.
pub struct UserPrincipalResolver<P: UserRecordProvider> {
    provider: Arc<P>,
}

impl<P: UserRecordProvider> UserPrincipalResolver<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

impl<P: UserRecordProvider> Clone for UserPrincipalResolver<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

#[async_trait]
impl<P: UserRecordProvider> PrincipalResolver for UserPrincipalResolver<P> {
    async fn resolve(&self, identifier: &str) -> Result<Principal, ResolveError> {
        tracing::debug!(backend = self.provider.backend_name(), "resolving principal");

        match self.provider.find_by_identifier(identifier).await? {
            Some(record) => Ok(Principal::from(record)),
            None => {
                tracing::debug!(
                    backend = self.provider.backend_name(),
                    "no user record for identifier"
                );
                Err(ResolveError::not_found(identifier))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::repos::error::RepoResult;
    use crate::repos::memory_user_repo::InMemoryUserRepo;
    use crate::services::auth::principal::{Authority, UserId, UserRecord};

    fn alice() -> UserRecord {
        UserRecord {
            id: UserId::new("u-42"),
            email: "alice@example.com".to_string(),
            password_hash: "$2a$10$alicehash".to_string(),
            authorities: BTreeSet::from([Authority::new("USER")]),
            enabled: true,
            locked: false,
        }
    }

    /// Wraps the in-memory store and counts lookups.
    struct CountingProvider {
        inner: InMemoryUserRepo,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl UserRecordProvider for CountingProvider {
        fn backend_name(&self) -> &'static str {
            "counting"
        }

        async fn find_by_identifier(&self, identifier: &str) -> RepoResult<Option<UserRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_identifier(identifier).await
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl UserRecordProvider for FailingProvider {
        fn backend_name(&self) -> &'static str {
            "failing"
        }

        async fn find_by_identifier(&self, _identifier: &str) -> RepoResult<Option<UserRecord>> {
            Err(RepoError::Db(sqlx::Error::PoolTimedOut))
        }
    }

    fn resolver_with(
        records: Vec<UserRecord>,
    ) -> (UserPrincipalResolver<CountingProvider>, Arc<CountingProvider>) {
        let provider = Arc::new(CountingProvider {
            inner: InMemoryUserRepo::with_records(records),
            calls: AtomicUsize::new(0),
        });
        (UserPrincipalResolver::new(Arc::clone(&provider)), provider)
    }

    #[tokio::test]
    async fn resolves_existing_user_into_principal() {
        let (resolver, _) = resolver_with(vec![alice()]);

        let principal = resolver.resolve("alice@example.com").await.unwrap();

        assert_eq!(principal.id(), &UserId::new("u-42"));
        assert_eq!(principal.username(), "alice@example.com");
        assert_eq!(principal.password_hash(), "$2a$10$alicehash");
        assert_eq!(
            principal.authorities(),
            &BTreeSet::from([Authority::new("USER")])
        );
        assert!(principal.is_enabled());
        assert!(principal.is_account_non_locked());
        assert_eq!(principal, Principal::from(alice()));
    }

    #[tokio::test]
    async fn unknown_email_is_not_found_with_identifier() {
        let (resolver, _) = resolver_with(vec![alice()]);

        let err = resolver.resolve("ghost@example.com").await.unwrap_err();

        match err {
            ResolveError::NotFound { identifier } => assert_eq!(identifier, "ghost@example.com"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_identifier_is_a_plain_miss() {
        let (resolver, provider) = resolver_with(vec![alice()]);

        let err = resolver.resolve("").await.unwrap_err();

        assert!(matches!(err, ResolveError::NotFound { ref identifier } if identifier.is_empty()));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn identifier_is_not_case_folded() {
        let (resolver, _) = resolver_with(vec![alice()]);

        let err = resolver.resolve("Alice@Example.com").await.unwrap_err();

        assert!(
            matches!(err, ResolveError::NotFound { ref identifier } if identifier == "Alice@Example.com")
        );
    }

    #[test]
    fn not_found_message_names_the_email() {
        let err = ResolveError::not_found("ghost@example.com");

        assert_eq!(err.to_string(), "user not found with email: ghost@example.com");
    }

    #[tokio::test]
    async fn each_resolve_queries_the_provider_once() {
        let (resolver, provider) = resolver_with(vec![alice()]);

        resolver.resolve("alice@example.com").await.unwrap();
        resolver.resolve("alice@example.com").await.unwrap();
        let _ = resolver.resolve("ghost@example.com").await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn repeated_resolves_are_equal_and_leave_store_untouched() {
        let (resolver, provider) = resolver_with(vec![alice()]);

        let first = resolver.resolve("alice@example.com").await.unwrap();
        let second = resolver.resolve("alice@example.com").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.inner.len().await, 1);
        assert_eq!(
            provider
                .inner
                .find_by_identifier("alice@example.com")
                .await
                .unwrap(),
            Some(alice())
        );
    }

    #[tokio::test]
    async fn provider_failure_propagates_as_provider_error() {
        let resolver = UserPrincipalResolver::new(Arc::new(FailingProvider));

        let err = resolver.resolve("alice@example.com").await.unwrap_err();

        assert!(matches!(
            err,
            ResolveError::Provider(RepoError::Db(sqlx::Error::PoolTimedOut))
        ));
    }

    #[tokio::test]
    async fn works_behind_a_trait_object() {
        let (resolver, _) = resolver_with(vec![alice()]);
        let resolver: Arc<dyn PrincipalResolver> = Arc::new(resolver);

        let principal = resolver.resolve("alice@example.com").await.unwrap();

        assert_eq!(principal.id().as_str(), "u-42");
    }

    #[tokio::test]
    async fn concurrent_resolves_agree() {
        let (resolver, provider) = resolver_with(vec![alice()]);

        let handles = (0..16)
            .map(|_| {
                let resolver = resolver.clone();
                tokio::spawn(async move { resolver.resolve("alice@example.com").await })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            let principal = handle.await.unwrap().unwrap();
            assert_eq!(principal, Principal::from(alice()));
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 16);
    }
}
