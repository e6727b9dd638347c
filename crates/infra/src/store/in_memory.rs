use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use stockledger_core::{
    CategoryId, Entity, ExpectedVersion, ItemId, LocationId, MutationId, UserId,
};
use stockledger_inventory::{Category, Item, Location, Mutation, User};

use super::{EntityStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    items: BTreeMap<ItemId, Item>,
    mutations: BTreeMap<MutationId, Mutation>,
    users: BTreeMap<UserId, User>,
    categories: BTreeMap<CategoryId, Category>,
    locations: BTreeMap<LocationId, Location>,
}

impl Tables {
    fn check_item_version(&self, item_id: ItemId, expected: ExpectedVersion) -> Result<(), StoreError> {
        let actual = self.items.get(&item_id).map(Item::version);
        expected
            .check(actual)
            .map_err(|e| StoreError::Conflict(e.to_string()))
    }
}

/// In-memory entity store.
///
/// Intended for tests/dev. All tables sit behind a single lock, so the paired
/// item + mutation writes are atomic with respect to every reader.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl EntityStore for InMemoryStore {
    fn find_item(&self, id: ItemId) -> Result<Item, StoreError> {
        self.read()?
            .items
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("item"))
    }

    fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.read()?.items.values().cloned().collect())
    }

    fn save_item(&self, item: Item, expected: ExpectedVersion) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.check_item_version(item.id(), expected)?;
        tables.items.insert(item.id(), item);
        Ok(())
    }

    fn find_mutation(&self, id: MutationId) -> Result<Mutation, StoreError> {
        self.read()?
            .mutations
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("mutation"))
    }

    fn list_mutations(&self, item_id: Option<ItemId>) -> Result<Vec<Mutation>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .mutations
            .values()
            .filter(|m| item_id.is_none_or(|id| m.item_id() == id))
            .cloned()
            .collect())
    }

    fn save_item_and_mutation(
        &self,
        item: Item,
        mutation: Mutation,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError> {
        if mutation.item_id() != item.id() {
            return Err(StoreError::InvalidWrite(
                "mutation does not belong to item".to_string(),
            ));
        }

        let mut tables = self.write()?;
        tables.check_item_version(item.id(), expected)?;
        if let Some(existing) = tables.mutations.get(&mutation.id()) {
            if existing.item_id() != item.id() {
                return Err(StoreError::InvalidWrite(
                    "mutation cannot move between items".to_string(),
                ));
            }
        }

        tables.mutations.insert(mutation.id(), mutation);
        tables.items.insert(item.id(), item);
        Ok(())
    }

    fn save_item_and_delete_mutation(
        &self,
        item: Item,
        mutation_id: MutationId,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.check_item_version(item.id(), expected)?;
        match tables.mutations.get(&mutation_id) {
            Some(existing) if existing.item_id() == item.id() => {}
            Some(_) => {
                return Err(StoreError::InvalidWrite(
                    "mutation does not belong to item".to_string(),
                ));
            }
            None => return Err(StoreError::NotFound("mutation")),
        }

        tables.mutations.remove(&mutation_id);
        tables.items.insert(item.id(), item);
        Ok(())
    }

    fn find_user(&self, id: UserId) -> Result<User, StoreError> {
        self.read()?
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("user"))
    }

    fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read()?.users.values().cloned().collect())
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!("email {}", user.email)));
        }
        if tables.users.contains_key(&user.id) {
            return Err(StoreError::Duplicate(format!("user {}", user.id)));
        }
        tables.users.insert(user.id, user);
        Ok(())
    }

    fn find_category(&self, id: CategoryId) -> Result<Category, StoreError> {
        self.read()?
            .categories
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("category"))
    }

    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.read()?.categories.values().cloned().collect())
    }

    fn insert_category(&self, category: Category) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.categories.contains_key(&category.id) {
            return Err(StoreError::Duplicate(format!("category {}", category.id)));
        }
        tables.categories.insert(category.id, category);
        Ok(())
    }

    fn find_location(&self, id: LocationId) -> Result<Location, StoreError> {
        self.read()?
            .locations
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("location"))
    }

    fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        Ok(self.read()?.locations.values().cloned().collect())
    }

    fn insert_location(&self, location: Location) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.locations.contains_key(&location.id) {
            return Err(StoreError::Duplicate(format!("location {}", location.id)));
        }
        tables.locations.insert(location.id, location);
        Ok(())
    }
}
