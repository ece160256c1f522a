//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! The submission service is generic over repository/reviewer/hook traits;
//! AppState pins it to the SQLite repository and the configured hook chain.

use std::path::PathBuf;
use std::sync::Arc;

use robotskills_core::hook::HookChain;
use robotskills_core::review::RuleBasedReviewer;
use robotskills_core::workflow::{HookDispatch, SubmissionService};
use robotskills_infra::config::load_global_config;
use robotskills_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use robotskills_infra::hook::build_hook_chain;
use robotskills_infra::sqlite::pool::{database_url, DatabasePool};
use robotskills_infra::sqlite::submission::SqliteSubmissionRepository;
use robotskills_types::config::GlobalConfig;

pub type ConcreteSubmissionService =
    SubmissionService<SqliteSubmissionRepository, RuleBasedReviewer, HookChain>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub submission_service: Arc<ConcreteSubmissionService>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory, load config, open the database, wire services.
    ///
    /// The long-running server detaches hooks; one-shot CLI commands await
    /// them so they finish before the process exits.
    pub async fn init(dispatch: HookDispatch) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        Ok(Self::from_parts(data_dir, config, db_pool, dispatch))
    }

    pub fn from_parts(
        data_dir: PathBuf,
        config: GlobalConfig,
        db_pool: DatabasePool,
        dispatch: HookDispatch,
    ) -> Self {
        let repo = SqliteSubmissionRepository::new(db_pool.clone());
        let reviewer = RuleBasedReviewer::new(config.review.clone());
        let hooks = build_hook_chain(&config, &db_pool);
        tracing::debug!(hooks = ?hooks.names(), ?dispatch, "hook chain ready");

        let service = SubmissionService::new(repo, reviewer, hooks).with_hook_dispatch(dispatch);
        Self {
            submission_service: Arc::new(service),
            config: Arc::new(config),
            data_dir,
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_state() -> AppState {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_path_buf();
    // Leak tempdir so it lives for the test
    std::mem::forget(dir);
    let pool = DatabasePool::new(&database_url(&data_dir)).await.unwrap();
    AppState::from_parts(data_dir, GlobalConfig::default(), pool, HookDispatch::Inline)
}
