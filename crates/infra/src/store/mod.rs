//! Entity store: persisted items, mutations and reference data.
//!
//! The ledger engine only relies on the guarantees spelled out on
//! [`EntityStore`]; any backend honoring them can be swapped in.

pub mod in_memory;

pub use in_memory::InMemoryStore;

use std::sync::Arc;

use thiserror::Error;

use stockledger_core::{CategoryId, ExpectedVersion, ItemId, LocationId, MutationId, UserId};
use stockledger_inventory::{Category, Item, Location, Mutation, User};

/// Entity store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// ledger rule failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The stored item version did not match the expected one.
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint was violated.
    #[error("duplicate {0}")]
    Duplicate(String),

    /// The write itself was malformed (e.g. mutation/item mismatch).
    #[error("invalid write: {0}")]
    InvalidWrite(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence contract consumed by the ledger engine and catalog service.
///
/// ## Atomicity
///
/// `save_item_and_mutation` and `save_item_and_delete_mutation` apply both of
/// their writes or neither, and no reader may observe one without the other.
///
/// ## Optimistic concurrency
///
/// Every item write carries an [`ExpectedVersion`]; when the stored item is
/// not at that version the write fails with [`StoreError::Conflict`] and
/// nothing is changed.
pub trait EntityStore: Send + Sync {
    fn find_item(&self, id: ItemId) -> Result<Item, StoreError>;
    fn list_items(&self) -> Result<Vec<Item>, StoreError>;
    /// Insert (`ExpectedVersion::Absent`) or replace an item.
    fn save_item(&self, item: Item, expected: ExpectedVersion) -> Result<(), StoreError>;

    fn find_mutation(&self, id: MutationId) -> Result<Mutation, StoreError>;
    /// All mutations, or only those of `item_id`, ordered by id.
    fn list_mutations(&self, item_id: Option<ItemId>) -> Result<Vec<Mutation>, StoreError>;
    /// Atomically write an item revision together with a new or edited mutation.
    fn save_item_and_mutation(
        &self,
        item: Item,
        mutation: Mutation,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError>;
    /// Atomically write an item revision and remove one of its mutations.
    fn save_item_and_delete_mutation(
        &self,
        item: Item,
        mutation_id: MutationId,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError>;

    fn find_user(&self, id: UserId) -> Result<User, StoreError>;
    fn list_users(&self) -> Result<Vec<User>, StoreError>;
    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    fn insert_user(&self, user: User) -> Result<(), StoreError>;

    fn find_category(&self, id: CategoryId) -> Result<Category, StoreError>;
    fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
    fn insert_category(&self, category: Category) -> Result<(), StoreError>;

    fn find_location(&self, id: LocationId) -> Result<Location, StoreError>;
    fn list_locations(&self) -> Result<Vec<Location>, StoreError>;
    fn insert_location(&self, location: Location) -> Result<(), StoreError>;
}

impl<S> EntityStore for Arc<S>
where
    S: EntityStore + ?Sized,
{
    fn find_item(&self, id: ItemId) -> Result<Item, StoreError> {
        (**self).find_item(id)
    }

    fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        (**self).list_items()
    }

    fn save_item(&self, item: Item, expected: ExpectedVersion) -> Result<(), StoreError> {
        (**self).save_item(item, expected)
    }

    fn find_mutation(&self, id: MutationId) -> Result<Mutation, StoreError> {
        (**self).find_mutation(id)
    }

    fn list_mutations(&self, item_id: Option<ItemId>) -> Result<Vec<Mutation>, StoreError> {
        (**self).list_mutations(item_id)
    }

    fn save_item_and_mutation(
        &self,
        item: Item,
        mutation: Mutation,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError> {
        (**self).save_item_and_mutation(item, mutation, expected)
    }

    fn save_item_and_delete_mutation(
        &self,
        item: Item,
        mutation_id: MutationId,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError> {
        (**self).save_item_and_delete_mutation(item, mutation_id, expected)
    }

    fn find_user(&self, id: UserId) -> Result<User, StoreError> {
        (**self).find_user(id)
    }

    fn list_users(&self) -> Result<Vec<User>, StoreError> {
        (**self).list_users()
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        (**self).insert_user(user)
    }

    fn find_category(&self, id: CategoryId) -> Result<Category, StoreError> {
        (**self).find_category(id)
    }

    fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        (**self).list_categories()
    }

    fn insert_category(&self, category: Category) -> Result<(), StoreError> {
        (**self).insert_category(category)
    }

    fn find_location(&self, id: LocationId) -> Result<Location, StoreError> {
        (**self).find_location(id)
    }

    fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        (**self).list_locations()
    }

    fn insert_location(&self, location: Location) -> Result<(), StoreError> {
        (**self).insert_location(location)
    }
}
