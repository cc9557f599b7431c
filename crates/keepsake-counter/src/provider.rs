use std::future::Future;

use async_trait::async_trait;

/// Source of a replacement id, consulted only when initializing a counter.
#[async_trait]
pub trait IdProvider: Send + Sync {
    /// Fetch the newest id, or `None` if it cannot be determined.
    async fn fetch(&self) -> Option<i64>;
}

/// Adapts an async closure into an [`IdProvider`].
pub struct FnProvider<F>(pub F);

#[async_trait]
impl<F, Fut> IdProvider for FnProvider<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<i64>> + Send + 'static,
{
    async fn fetch(&self) -> Option<i64> {
        (self.0)().await
    }
}

/// Provider that never yields an id.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProvider;

#[async_trait]
impl IdProvider for NoProvider {
    async fn fetch(&self) -> Option<i64> {
        None
    }
}
