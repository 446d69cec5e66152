use crate::shared::entity::ID;

/// A `Property` is a read-only lookup used to enrich reminder texts with the
/// building name the tenant lives in.
#[derive(Debug, Clone)]
pub struct Property {
    pub id: ID,
    pub name: String,
    pub location: String,
}
