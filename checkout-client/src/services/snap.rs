//! Midtrans Snap pop-up: script loading and the widget seam.

use async_trait::async_trait;
use std::sync::{Arc, OnceLock};
use tokio::sync::OnceCell;

use crate::config::CheckoutConfig;
use crate::error::ScriptLoadError;
use crate::models::SnapResult;

/// Injects the Snap script into the host page (or whatever the host is).
#[async_trait]
pub trait ScriptLoader: Send + Sync {
    async fn inject(&self, src: &str, client_key: &str) -> Result<(), ScriptLoadError>;
}

/// How a Snap pop-up ended. Exactly one per `pay` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapOutcome {
    Success(SnapResult),
    Pending(SnapResult),
    Error(SnapResult),
    /// The user closed the pop-up without finishing.
    Closed,
}

/// The hosted checkout widget (`window.snap.pay` in a browser).
#[async_trait]
pub trait SnapWidget: Send + Sync {
    async fn pay(&self, token: &str) -> SnapOutcome;
}

static GLOBAL_LOADER: OnceLock<Arc<SnapLoader>> = OnceLock::new();

/// Loads the Snap script at most once.
///
/// Concurrent callers share a single in-flight load. A successful load is kept
/// for the life of the loader; a failed one is not, so the next call tries
/// again.
pub struct SnapLoader {
    loader: Arc<dyn ScriptLoader>,
    script_url: String,
    client_key: String,
    loaded: OnceCell<()>,
}

impl SnapLoader {
    pub fn new(
        loader: Arc<dyn ScriptLoader>,
        script_url: impl Into<String>,
        client_key: impl Into<String>,
    ) -> Self {
        Self {
            loader,
            script_url: script_url.into(),
            client_key: client_key.into(),
            loaded: OnceCell::new(),
        }
    }

    pub fn from_config(loader: Arc<dyn ScriptLoader>, config: &CheckoutConfig) -> Self {
        Self::new(loader, config.snap_script_url(), config.client_key.clone())
    }

    /// Process-wide loader, created by `init` on first use and kept until exit.
    pub fn global(init: impl FnOnce() -> SnapLoader) -> Arc<SnapLoader> {
        GLOBAL_LOADER.get_or_init(|| Arc::new(init())).clone()
    }

    pub async fn ensure_loaded(&self) -> Result<(), ScriptLoadError> {
        self.loaded
            .get_or_try_init(|| async {
                tracing::debug!(src = %self.script_url, "Loading Snap script");
                self.loader
                    .inject(&self.script_url, &self.client_key)
                    .await
                    .inspect_err(|e| tracing::warn!(error = %e, "Snap script failed to load"))
            })
            .await
            .map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    pub fn script_url(&self) -> &str {
        &self.script_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingLoader {
        calls: AtomicUsize,
        fail_first: usize,
    }

    #[async_trait]
    impl ScriptLoader for CountingLoader {
        async fn inject(&self, _src: &str, _client_key: &str) -> Result<(), ScriptLoadError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            if call < self.fail_first {
                Err(ScriptLoadError("network error".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn loader(fail_first: usize) -> (Arc<CountingLoader>, SnapLoader) {
        let inner = Arc::new(CountingLoader {
            calls: AtomicUsize::new(0),
            fail_first,
        });
        let snap = SnapLoader::new(inner.clone(), "https://app.sandbox.midtrans.com/snap/snap.js", "SB-Mid-client-x");
        (inner, snap)
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_load() {
        let (inner, snap) = loader(0);

        let (a, b, c) = tokio::join!(snap.ensure_loaded(), snap.ensure_loaded(), snap.ensure_loaded());
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        snap.ensure_loaded().await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert!(snap.is_loaded());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_load_is_retried() {
        let (inner, snap) = loader(1);

        let err = snap.ensure_loaded().await.unwrap_err();
        assert_eq!(err, ScriptLoadError("network error".to_string()));
        assert!(!snap.is_loaded());

        snap.ensure_loaded().await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert!(snap.is_loaded());
    }

    #[tokio::test]
    async fn global_loader_is_created_once() {
        let first = SnapLoader::global(|| loader(0).1);
        let second = SnapLoader::global(|| panic!("global loader rebuilt"));
        assert!(Arc::ptr_eq(&first, &second));
    }
}
