//! Catalog service: items and the reference data they point at.
//!
//! Item edits here never touch `stock`; they still run as item transactions
//! so a concurrent ledger write is never overwritten with a stale count.

use tracing::instrument;

use stockledger_core::{CategoryId, Entity, ExpectedVersion, ItemId, LocationId, UserId};
use stockledger_inventory::{
    Category, Item, ItemPatch, Location, NewCategory, NewItem, NewLocation, NewUser, User,
};

use crate::error::LedgerError;
use crate::store::EntityStore;
use crate::transaction::ItemTransactions;

#[derive(Debug)]
pub struct CatalogService<S> {
    store: S,
    tx: ItemTransactions,
}

impl<S> CatalogService<S> {
    pub fn new(store: S, tx: ItemTransactions) -> Self {
        Self { store, tx }
    }
}

impl<S> CatalogService<S>
where
    S: EntityStore,
{
    pub fn create_category(&self, new: NewCategory) -> Result<Category, LedgerError> {
        let category = Category::create(CategoryId::new(), new)?;
        self.store.insert_category(category.clone())?;
        tracing::info!(category_id = %category.id, "category created");
        Ok(category)
    }

    pub fn get_category(&self, id: CategoryId) -> Result<Category, LedgerError> {
        Ok(self.store.find_category(id)?)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, LedgerError> {
        Ok(self.store.list_categories()?)
    }

    pub fn create_location(&self, new: NewLocation) -> Result<Location, LedgerError> {
        let location = Location::create(LocationId::new(), new)?;
        self.store.insert_location(location.clone())?;
        tracing::info!(location_id = %location.id, "location created");
        Ok(location)
    }

    pub fn get_location(&self, id: LocationId) -> Result<Location, LedgerError> {
        Ok(self.store.find_location(id)?)
    }

    pub fn list_locations(&self) -> Result<Vec<Location>, LedgerError> {
        Ok(self.store.list_locations()?)
    }

    pub fn register_user(&self, new: NewUser) -> Result<User, LedgerError> {
        let user = User::create(UserId::new(), new)?;
        self.store.insert_user(user.clone())?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> Result<User, LedgerError> {
        Ok(self.store.find_user(id)?)
    }

    pub fn list_users(&self) -> Result<Vec<User>, LedgerError> {
        Ok(self.store.list_users()?)
    }

    #[instrument(skip(self, new))]
    pub fn create_item(&self, new: NewItem) -> Result<Item, LedgerError> {
        self.store.find_category(new.category_id)?;
        self.store.find_location(new.location_id)?;

        let item = Item::create(ItemId::new(), new)?;
        self.store.save_item(item.clone(), ExpectedVersion::Absent)?;
        tracing::info!(item_id = %item.id(), "item created");
        Ok(item)
    }

    pub fn get_item(&self, id: ItemId) -> Result<Item, LedgerError> {
        Ok(self.store.find_item(id)?)
    }

    pub fn list_items(&self) -> Result<Vec<Item>, LedgerError> {
        Ok(self.store.list_items()?)
    }

    /// Edit descriptive fields of an item.
    #[instrument(skip(self, patch))]
    pub fn update_item(&self, item_id: ItemId, patch: ItemPatch) -> Result<Item, LedgerError> {
        if let Some(category_id) = patch.category_id {
            self.store.find_category(category_id)?;
        }
        if let Some(location_id) = patch.location_id {
            self.store.find_location(location_id)?;
        }

        let item = self.tx.run(item_id, "update_item", || {
            let current = self.store.find_item(item_id)?;
            let revised = current.revise_details(patch.clone())?;
            self.store
                .save_item(revised.clone(), ExpectedVersion::Exact(current.version()))?;
            Ok(revised)
        })?;

        tracing::info!(%item_id, "item updated");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::store::InMemoryStore;
    use crate::LedgerConfig;

    fn service() -> CatalogService<Arc<InMemoryStore>> {
        let (_, catalog) = LedgerConfig::default().build(Arc::new(InMemoryStore::new()));
        catalog
    }

    fn seed_refs(catalog: &CatalogService<Arc<InMemoryStore>>) -> (Category, Location) {
        let category = catalog
            .create_category(NewCategory {
                name: "Tools".to_string(),
            })
            .unwrap();
        let location = catalog
            .create_location(NewLocation {
                name: "Aisle 3".to_string(),
                address: Some("12 Dock Road".to_string()),
            })
            .unwrap();
        (category, location)
    }

    fn new_item(category: &Category, location: &Location) -> NewItem {
        NewItem {
            name: "Hammer".to_string(),
            code: "HMR".to_string(),
            category_id: category.id,
            location_id: location.id,
            description: "claw hammer".to_string(),
        }
    }

    #[test]
    fn duplicate_email_is_a_validation_error() {
        let catalog = service();
        let new = NewUser {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        };
        catalog.register_user(new.clone()).unwrap();

        let err = catalog
            .register_user(NewUser {
                email: "ANA@example.com".to_string(),
                ..new
            })
            .unwrap_err();

        assert!(matches!(err, LedgerError::Validation(msg) if msg.contains("already been taken")));
        assert_eq!(catalog.list_users().unwrap().len(), 1);
    }

    #[test]
    fn item_requires_existing_category_and_location() {
        let catalog = service();
        let (category, location) = seed_refs(&catalog);

        let mut orphan = new_item(&category, &location);
        orphan.category_id = CategoryId::new();
        assert_eq!(
            catalog.create_item(orphan).unwrap_err(),
            LedgerError::NotFound("category")
        );

        let mut homeless = new_item(&category, &location);
        homeless.location_id = LocationId::new();
        assert_eq!(
            catalog.create_item(homeless).unwrap_err(),
            LedgerError::NotFound("location")
        );

        assert!(catalog.list_items().unwrap().is_empty());
    }

    #[test]
    fn new_item_starts_empty() {
        let catalog = service();
        let (category, location) = seed_refs(&catalog);

        let item = catalog.create_item(new_item(&category, &location)).unwrap();

        assert_eq!(item.stock(), 0);
        assert_eq!(catalog.get_item(item.id()).unwrap(), item);
    }

    #[test]
    fn update_item_rejects_unknown_location() {
        let catalog = service();
        let (category, location) = seed_refs(&catalog);
        let item = catalog.create_item(new_item(&category, &location)).unwrap();

        let err = catalog
            .update_item(
                item.id(),
                ItemPatch {
                    location_id: Some(LocationId::new()),
                    ..ItemPatch::default()
                },
            )
            .unwrap_err();

        assert_eq!(err, LedgerError::NotFound("location"));
        assert_eq!(catalog.get_item(item.id()).unwrap(), item);
    }

    #[test]
    fn update_item_bumps_version() {
        let catalog = service();
        let (category, location) = seed_refs(&catalog);
        let item = catalog.create_item(new_item(&category, &location)).unwrap();

        let updated = catalog
            .update_item(
                item.id(),
                ItemPatch {
                    code: Some("HM2".to_string()),
                    ..ItemPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.code(), "HM2");
        assert_eq!(updated.version(), item.version() + 1);
    }

    #[test]
    fn missing_reference_data_is_not_found() {
        let catalog = service();
        assert_eq!(
            catalog.get_category(CategoryId::new()).unwrap_err(),
            LedgerError::NotFound("category")
        );
        assert_eq!(
            catalog.get_user(UserId::new()).unwrap_err(),
            LedgerError::NotFound("user")
        );
        assert_eq!(
            catalog.get_item(ItemId::new()).unwrap_err(),
            LedgerError::NotFound("item")
        );
    }
}
