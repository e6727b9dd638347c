//! Inventory domain module.
//!
//! This crate contains the business rules for items and their stock ledger,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod catalog;
pub mod item;
pub mod ledger;
pub mod mutation;

pub use catalog::{Category, Location, NewCategory, NewLocation, NewUser, User};
pub use item::{Item, ItemPatch, NewItem};
pub use ledger::{LedgerEntry, plan_create, plan_delete, plan_update};
pub use mutation::{AmountChange, Mutation, MutationPatch, MutationType, NewMutation};
