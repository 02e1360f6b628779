use std::sync::Arc;

use proposey_agent::generator::DraftGenerator;
use proposey_agent::llm::{LlmError, OpenAiCompatibleClient};
use proposey_agent::runtime::ProposalRuntime;
use proposey_agent::tools::{HttpProposalApi, ProposalApiError};
use proposey_core::catalog::default_catalog;
use proposey_core::config::{AppConfig, ConfigError, LoadOptions};
use proposey_db::{
    connect_with_config, migrations, DbPool, ProposalLogRecorder, ProposalLogRepository,
    SqlProposalLogRepository,
};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub runtime: Arc<ProposalRuntime>,
    pub history: Arc<dyn ProposalLogRepository>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("llm client setup failed: {0}")]
    Llm(#[source] LlmError),
    #[error("proposal api setup failed: {0}")]
    ProposalApi(#[source] ProposalApiError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        llm_provider = config.llm.provider.as_str(),
        "starting application bootstrap"
    );

    let db_pool =
        connect_with_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let llm = OpenAiCompatibleClient::from_config(&config.llm).map_err(BootstrapError::Llm)?;
    let proposal_api =
        HttpProposalApi::from_config(&config.proposals).map_err(BootstrapError::ProposalApi)?;
    info!(
        event_name = "system.bootstrap.clients_ready",
        correlation_id = "bootstrap",
        llm_base_url = %llm.base_url(),
        llm_model = %llm.model(),
        proposals_endpoint = %proposal_api.endpoint(),
        "upstream clients configured"
    );

    let history: Arc<dyn ProposalLogRepository> =
        Arc::new(SqlProposalLogRepository::new(db_pool.clone()));
    let runtime = ProposalRuntime::new(
        DraftGenerator::new(Arc::new(llm)),
        Arc::new(proposal_api),
        Arc::new(ProposalLogRecorder::new(history.clone())),
        default_catalog(),
        config.proposals.proposal_env(),
        config.audit.failure_policy,
    );

    Ok(Application { config, db_pool, runtime: Arc::new(runtime), history })
}
