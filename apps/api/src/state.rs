use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::taxonomy::client::TaxonomyProvider;
use crate::taxonomy::filters::DenyList;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable taxonomy provider. Production: the O*NET web-services
    /// client; tests substitute an in-memory fake.
    pub taxonomy: Arc<dyn TaxonomyProvider>,
    pub llm: LlmClient,
    /// Assessability deny-list, loaded once at startup from the bundled
    /// artifact or a configured override file.
    pub denylist: Arc<DenyList>,
    pub config: Config,
}
