mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::Repos;
pub use repos::{
    IDispatchLogRepo, IPropertyRepo, ITenantRepo, InMemoryDispatchLogRepo, InMemoryPropertyRepo,
    InMemoryTenantRepo,
};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::{ISys, RealSys};

/// Everything the reminder scheduler needs from the outside world:
/// repositories, configuration, the clock and the SMS gateway.
#[derive(Clone)]
pub struct PayloopContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub sms: Arc<SmsGateway>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl PayloopContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let transport = Arc::new(HttpSmsTransport::new(
            config.sms_gateway_url.clone(),
            config.sms_gateway_api_key.clone(),
        ));
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            sms: Arc::new(SmsGateway::new(transport)),
        }
    }

    /// Context backed by in-memory repositories and an injectable transport.
    /// Tests swap `sys` and tweak `config` directly on the returned value.
    pub fn create_inmemory(transport: Arc<dyn ISmsTransport>) -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            sms: Arc::new(SmsGateway::new(transport)),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> PayloopContext {
    PayloopContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
