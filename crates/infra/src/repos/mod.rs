mod dispatch_log;
mod property;
mod shared;
mod tenant;

pub use dispatch_log::{IDispatchLogRepo, InMemoryDispatchLogRepo, PostgresDispatchLogRepo};
pub use property::{IPropertyRepo, InMemoryPropertyRepo, PostgresPropertyRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use tenant::{ITenantRepo, InMemoryTenantRepo, PostgresTenantRepo};
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub tenants: Arc<dyn ITenantRepo>,
    pub properties: Arc<dyn IPropertyRepo>,
    pub dispatch_log: Arc<dyn IDispatchLogRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            tenants: Arc::new(PostgresTenantRepo::new(pool.clone())),
            properties: Arc::new(PostgresPropertyRepo::new(pool.clone())),
            dispatch_log: Arc::new(PostgresDispatchLogRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            tenants: Arc::new(InMemoryTenantRepo::new()),
            properties: Arc::new(InMemoryPropertyRepo::new()),
            dispatch_log: Arc::new(InMemoryDispatchLogRepo::new()),
        }
    }
}
