mod inmemory;
mod postgres;

pub use inmemory::InMemoryTenantRepo;
use payloop_domain::Tenant;
pub use postgres::PostgresTenantRepo;

/// Read access to the tenant snapshot maintained by the management CRUD
/// surface. `insert` exists for seeding and tests; the scheduler never
/// mutates tenants. Status filtering happens in the reminder pass, which
/// needs every non-inactive tenant, so the snapshot read is unfiltered.
#[async_trait::async_trait]
pub trait ITenantRepo: Send + Sync {
    async fn insert(&self, tenant: &Tenant) -> anyhow::Result<()>;
    async fn find_all(&self) -> anyhow::Result<Vec<Tenant>>;
}
