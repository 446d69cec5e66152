mod inmemory;
mod postgres;

pub use inmemory::InMemoryPropertyRepo;
use payloop_domain::Property;
pub use postgres::PostgresPropertyRepo;

#[async_trait::async_trait]
pub trait IPropertyRepo: Send + Sync {
    async fn insert(&self, property: &Property) -> anyhow::Result<()>;
    async fn find_all(&self) -> anyhow::Result<Vec<Property>>;
}
