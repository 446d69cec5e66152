use super::IPropertyRepo;
use payloop_domain::Property;
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresPropertyRepo {
    pool: PgPool,
}

impl PostgresPropertyRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PropertyRaw {
    property_uid: Uuid,
    name: String,
    location: String,
}

impl From<PropertyRaw> for Property {
    fn from(e: PropertyRaw) -> Self {
        Self {
            id: e.property_uid.into(),
            name: e.name,
            location: e.location,
        }
    }
}

#[async_trait::async_trait]
impl IPropertyRepo for PostgresPropertyRepo {
    async fn insert(&self, property: &Property) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO properties(property_uid, name, location)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(property.id.inner_ref())
        .bind(&property.name)
        .bind(&property.location)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert property: {:?}. DB returned error: {:?}",
                property, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Property>> {
        let properties_raw: Vec<PropertyRaw> = sqlx::query_as(
            r#"
            SELECT * FROM properties
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Find all properties failed. DB returned error: {:?}", e);
            e
        })?;
        Ok(properties_raw.into_iter().map(|p| p.into()).collect())
    }
}
