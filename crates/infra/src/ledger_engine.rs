//! Stock ledger engine.
//!
//! Keeps every item's cached `stock` equal to the sum of its mutation amounts
//! while mutations are created, edited and deleted concurrently.
//!
//! ## Execution flow
//!
//! ```text
//! request
//!   ↓
//! 1. Acquire the item's lock (bounded wait)
//!   ↓
//! 2. Load item (+ mutation) snapshot
//!   ↓
//! 3. Plan the change with the pure ledger rules
//!   ↓
//! 4. Write item + mutation atomically, expecting the loaded item version
//!   ↓
//! 5. Release the lock; on contention go back to 1 (bounded retries)
//! ```
//!
//! Rule failures abort before step 4, so nothing is written.

use serde::Serialize;
use tracing::instrument;

use stockledger_core::{Entity, ExpectedVersion, ItemId, MutationId};
use stockledger_inventory::{
    LedgerEntry, Mutation, MutationPatch, NewMutation, ledger::ledger_sum, plan_create,
    plan_delete, plan_update,
};

use crate::error::LedgerError;
use crate::store::EntityStore;
use crate::transaction::ItemTransactions;

/// Cached stock compared against the ledger it is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub item_id: ItemId,
    pub cached_stock: i64,
    pub ledger_sum: i64,
    pub mutation_count: usize,
    pub consistent: bool,
}

/// The stock ledger engine.
#[derive(Debug)]
pub struct StockLedger<S> {
    store: S,
    tx: ItemTransactions,
}

impl<S> StockLedger<S> {
    pub fn new(store: S, tx: ItemTransactions) -> Self {
        Self { store, tx }
    }
}

impl<S> StockLedger<S>
where
    S: EntityStore,
{
    /// Record a new mutation and apply it to the item's stock.
    #[instrument(
        skip(self, input),
        fields(item_id = %input.item_id, kind = %input.kind, amount = input.amount)
    )]
    pub fn create_mutation(&self, input: NewMutation) -> Result<LedgerEntry, LedgerError> {
        input.kind.check_sign(input.amount)?;
        self.store.find_user(input.user_id)?;

        let item_id = input.item_id;
        let mutation_id = MutationId::new();
        let entry = self.tx.run(item_id, "create_mutation", || {
            let item = self.store.find_item(item_id)?;
            let entry = plan_create(&item, mutation_id, input.clone())?;
            self.store.save_item_and_mutation(
                entry.item.clone(),
                entry.mutation.clone(),
                ExpectedVersion::Exact(item.version()),
            )?;
            Ok(entry)
        })?;

        tracing::info!(
            %item_id,
            mutation_id = %entry.mutation.id(),
            stock = entry.item.stock(),
            "mutation recorded"
        );
        Ok(entry)
    }

    /// Edit a mutation. Type/amount changes revert the old contribution and
    /// apply the new one; date/description edits leave stock untouched.
    #[instrument(skip(self, patch))]
    pub fn update_mutation(
        &self,
        mutation_id: MutationId,
        patch: MutationPatch,
    ) -> Result<LedgerEntry, LedgerError> {
        let item_id = self.store.find_mutation(mutation_id)?.item_id();

        let entry = self.tx.run(item_id, "update_mutation", || {
            let current = self.store.find_mutation(mutation_id)?;
            let item = self.store.find_item(item_id)?;
            let entry = plan_update(&item, &current, patch.clone())?;
            self.store.save_item_and_mutation(
                entry.item.clone(),
                entry.mutation.clone(),
                ExpectedVersion::Exact(item.version()),
            )?;
            Ok(entry)
        })?;

        tracing::info!(
            %item_id,
            %mutation_id,
            stock = entry.item.stock(),
            "mutation updated"
        );
        Ok(entry)
    }

    /// Delete a mutation, reverting its effect on stock.
    ///
    /// Returns the reverted item and the mutation as it was before deletion.
    #[instrument(skip(self))]
    pub fn delete_mutation(&self, mutation_id: MutationId) -> Result<LedgerEntry, LedgerError> {
        let item_id = self.store.find_mutation(mutation_id)?.item_id();

        let entry = self.tx.run(item_id, "delete_mutation", || {
            let current = self.store.find_mutation(mutation_id)?;
            let item = self.store.find_item(item_id)?;
            let reverted = plan_delete(&item, &current)?;
            self.store.save_item_and_delete_mutation(
                reverted.clone(),
                mutation_id,
                ExpectedVersion::Exact(item.version()),
            )?;
            Ok(LedgerEntry {
                item: reverted,
                mutation: current,
            })
        })?;

        tracing::info!(
            %item_id,
            %mutation_id,
            stock = entry.item.stock(),
            "mutation deleted"
        );
        Ok(entry)
    }

    pub fn get_mutation(&self, mutation_id: MutationId) -> Result<Mutation, LedgerError> {
        Ok(self.store.find_mutation(mutation_id)?)
    }

    /// Mutations ordered by date, then creation. Filtering by an unknown
    /// item is `NotFound`.
    pub fn list_mutations(&self, item_id: Option<ItemId>) -> Result<Vec<Mutation>, LedgerError> {
        if let Some(item_id) = item_id {
            self.store.find_item(item_id)?;
        }
        let mut mutations = self.store.list_mutations(item_id)?;
        mutations.sort_by_key(|m| (m.date(), m.id()));
        Ok(mutations)
    }

    /// Recompute the ledger sum for an item and compare it with its cached stock.
    ///
    /// Read-only; runs under the item lock so the snapshot is not taken in
    /// the middle of a ledger write.
    #[instrument(skip(self))]
    pub fn reconcile(&self, item_id: ItemId) -> Result<Reconciliation, LedgerError> {
        let report = self.tx.run(item_id, "reconcile", || {
            let item = self.store.find_item(item_id)?;
            let mutations = self.store.list_mutations(Some(item_id))?;
            let sum = ledger_sum(&mutations);
            let total = i64::try_from(sum)
                .map_err(|_| LedgerError::Store(format!("ledger sum {sum} out of range")))?;

            Ok(Reconciliation {
                item_id,
                cached_stock: item.stock(),
                ledger_sum: total,
                mutation_count: mutations.len(),
                consistent: i128::from(item.stock()) == sum,
            })
        })?;

        if !report.consistent {
            tracing::warn!(
                %item_id,
                cached_stock = report.cached_stock,
                ledger_sum = report.ledger_sum,
                "stock cache diverged from ledger"
            );
        }
        Ok(report)
    }
}
