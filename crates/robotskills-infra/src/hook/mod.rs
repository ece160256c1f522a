//! Hook chain builder -- wires concrete transition hooks from config.
//!
//! Lives in `robotskills-infra` because it assembles concrete adapters. The
//! resulting [`HookChain`] is handed to `SubmissionService` in
//! `robotskills-core`.
//!
//! Chain order: `[SqliteNotificationHook, HttpRevalidationHook]`

pub mod http;

use robotskills_core::hook::HookChain;
use robotskills_types::config::GlobalConfig;

use crate::sqlite::notification::SqliteNotificationHook;
use crate::sqlite::pool::DatabasePool;

pub use http::HttpRevalidationHook;

/// Build the post-transition hook chain.
///
/// 1. Developer notifications (if `notifications.enabled`)
/// 2. Storefront revalidation (if `revalidation.endpoint` is set)
pub fn build_hook_chain(config: &GlobalConfig, pool: &DatabasePool) -> HookChain {
    let mut chain = HookChain::new();

    if config.notifications.enabled {
        chain = chain.with(SqliteNotificationHook::new(pool.clone()));
    }

    match HttpRevalidationHook::from_config(&config.revalidation) {
        Ok(Some(revalidate)) => {
            tracing::info!(endpoint = %revalidate.endpoint(), "storefront revalidation enabled");
            chain = chain.with(revalidate);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "storefront revalidation disabled");
        }
    }

    tracing::debug!(hooks = ?chain.names(), "transition hooks configured");
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;

    #[tokio::test]
    async fn test_default_chain_only_notifies() {
        let pool = test_pool().await;
        let chain = build_hook_chain(&GlobalConfig::default(), &pool);
        assert_eq!(chain.names(), vec!["notification"]);
    }

    #[tokio::test]
    async fn test_full_and_empty_chains() {
        let pool = test_pool().await;

        let mut config = GlobalConfig::default();
        config.revalidation.endpoint = Some("https://www.robotskills.test/api/revalidate".to_string());
        let chain = build_hook_chain(&config, &pool);
        assert_eq!(chain.names(), vec!["notification", "revalidate"]);

        config.notifications.enabled = false;
        config.revalidation.endpoint = None;
        assert!(build_hook_chain(&config, &pool).is_empty());
    }
}
