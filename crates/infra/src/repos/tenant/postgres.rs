use super::ITenantRepo;
use payloop_domain::{Tenant, TenantStatus};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresTenantRepo {
    pool: PgPool,
}

impl PostgresTenantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TenantRaw {
    tenant_uid: Uuid,
    name: String,
    phone: String,
    rent_amount: i64,
    due_day: i32,
    status: String,
    property_uid: Uuid,
}

impl TryFrom<TenantRaw> for Tenant {
    type Error = anyhow::Error;

    fn try_from(e: TenantRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.tenant_uid.into(),
            name: e.name,
            phone: e.phone,
            rent_amount: e.rent_amount,
            due_day: e.due_day as u32,
            status: e.status.parse::<TenantStatus>()?,
            property_id: e.property_uid.into(),
        })
    }
}

#[async_trait::async_trait]
impl ITenantRepo for PostgresTenantRepo {
    async fn insert(&self, tenant: &Tenant) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tenants(tenant_uid, name, phone, rent_amount, due_day, status, property_uid)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(tenant.id.inner_ref())
        .bind(&tenant.name)
        .bind(&tenant.phone)
        .bind(tenant.rent_amount)
        .bind(tenant.due_day as i32)
        .bind(tenant.status.as_str())
        .bind(tenant.property_id.inner_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert tenant: {:?}. DB returned error: {:?}",
                tenant, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Tenant>> {
        let tenants_raw: Vec<TenantRaw> = sqlx::query_as(
            r#"
            SELECT * FROM tenants
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Find all tenants failed. DB returned error: {:?}", e);
            e
        })?;
        tenants_raw.into_iter().map(|t| t.try_into()).collect()
    }
}
