use crate::{error::*, models::*};
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

/// Read-only item lookup contract consumed by the engine.
///
/// Soft-deleted items resolve as `ItemNotFound`.
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    async fn resolve_item(&self, id: Uuid) -> CatalogResult<CatalogItem>;
}

/// In-memory catalog for development and testing.
pub struct InMemoryCatalog {
    items: DashMap<Uuid, CatalogItem>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Add an item and return its id.
    pub fn add_item(&self, item: CatalogItem) -> Uuid {
        let id = item.id;
        self.items.insert(id, item);
        id
    }

    pub fn trash_item(&self, id: Uuid, actor: Uuid) {
        if let Some(mut item) = self.items.get_mut(&id) {
            item.meta.trash(actor);
        }
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceCatalog for InMemoryCatalog {
    async fn resolve_item(&self, id: Uuid) -> CatalogResult<CatalogItem> {
        self.items
            .get(&id)
            .filter(|item| !item.meta.deleted)
            .map(|item| item.value().clone())
            .ok_or(CatalogError::ItemNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn trashed_items_do_not_resolve() {
        let catalog = InMemoryCatalog::new();
        let admin = Uuid::new_v4();
        let id = catalog.add_item(CatalogItem::new(
            "Dental cleaning",
            Decimal::from(100),
            3,
            admin,
        ));

        assert!(catalog.resolve_item(id).await.is_ok());

        catalog.trash_item(id, admin);
        assert!(matches!(
            catalog.resolve_item(id).await,
            Err(CatalogError::ItemNotFound)
        ));
    }
}
