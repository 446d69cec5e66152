use super::IPropertyRepo;
use crate::repos::shared::inmemory_repo::*;
use payloop_domain::Property;

pub struct InMemoryPropertyRepo {
    properties: std::sync::Mutex<Vec<Property>>,
}

impl InMemoryPropertyRepo {
    pub fn new() -> Self {
        Self {
            properties: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPropertyRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPropertyRepo for InMemoryPropertyRepo {
    async fn insert(&self, property: &Property) -> anyhow::Result<()> {
        insert(property, &self.properties);
        Ok(())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Property>> {
        Ok(find_by(&self.properties, |_| true))
    }
}
