//! Stock ledger rules.
//!
//! An item's `stock` is a cache of the sum of `amount` over its mutations.
//! Every function here takes the current item (and mutation) snapshot and
//! returns the next revisions to persist, or the rule that forbids the change.
//! Nothing is mutated in place, so a rejected plan leaves the inputs untouched.

use stockledger_core::{DomainError, DomainResult, Entity, MutationId};

use crate::item::{Item, require_text};
use crate::mutation::{AmountChange, Mutation, MutationPatch, NewMutation};

/// Item and mutation revisions to be written together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub item: Item,
    pub mutation: Mutation,
}

/// Record a new mutation against `item`.
pub fn plan_create(item: &Item, id: MutationId, new: NewMutation) -> DomainResult<LedgerEntry> {
    ensure_same_item(item, new.item_id)?;
    new.kind.check_sign(new.amount)?;
    require_text("description", &new.description)?;

    let projected = apply_delta(item.stock(), new.amount)?;
    if projected < 0 {
        return Err(DomainError::InsufficientStock(format!(
            "insufficient item stock for mutation (stock {}, amount {})",
            item.stock(),
            new.amount
        )));
    }

    Ok(LedgerEntry {
        item: item.with_stock(projected),
        mutation: new.into_mutation(id),
    })
}

/// Edit `current`, a mutation previously applied to `item`.
///
/// A type/amount change reverts the old contribution first and validates the
/// new amount against the reverted baseline. Date and description edits leave
/// stock alone.
pub fn plan_update(
    item: &Item,
    current: &Mutation,
    patch: MutationPatch,
) -> DomainResult<LedgerEntry> {
    ensure_same_item(item, current.item_id())?;
    if let Some(description) = &patch.description {
        require_text("description", description)?;
    }

    let mut mutation = current.clone();
    let stock = match patch.amount {
        AmountChange::Unchanged => item.stock(),
        AmountChange::Changed { kind, amount } => {
            kind.check_sign(amount)?;
            let reverted = revert(item.stock(), current.amount())?;
            let reapplied = apply_delta(reverted, amount)?;
            if reapplied < 0 {
                return Err(DomainError::InsufficientStock(format!(
                    "insufficient item stock for mutation (reverted stock {reverted}, amount {amount})"
                )));
            }
            mutation.set_amount(kind, amount);
            reapplied
        }
    };
    mutation.set_details(patch.date, patch.description);

    Ok(LedgerEntry {
        item: item.with_stock(stock),
        mutation,
    })
}

/// Revert `current` out of `item` ahead of deleting it.
pub fn plan_delete(item: &Item, current: &Mutation) -> DomainResult<Item> {
    ensure_same_item(item, current.item_id())?;
    let reverted = revert(item.stock(), current.amount())?;
    Ok(item.with_stock(reverted))
}

/// Sum of amounts over a ledger, i.e. what `stock` must equal.
pub fn ledger_sum<'a>(mutations: impl IntoIterator<Item = &'a Mutation>) -> i128 {
    mutations.into_iter().map(|m| i128::from(m.amount())).sum()
}

fn ensure_same_item(item: &Item, item_id: stockledger_core::ItemId) -> DomainResult<()> {
    if item.id() != item_id {
        return Err(DomainError::validation("mutation does not belong to item"));
    }
    Ok(())
}

fn apply_delta(stock: i64, delta: i64) -> DomainResult<i64> {
    stock
        .checked_add(delta)
        .ok_or_else(|| DomainError::validation("amount out of range"))
}

fn revert(stock: i64, amount: i64) -> DomainResult<i64> {
    let reverted = stock
        .checked_sub(amount)
        .ok_or_else(|| DomainError::validation("amount out of range"))?;
    if reverted < 0 {
        return Err(DomainError::RevertUnderflow(format!(
            "insufficient item stock for reverting mutation (stock {stock}, mutation amount {amount})"
        )));
    }
    Ok(reverted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use stockledger_core::{CategoryId, ItemId, LocationId, UserId};

    use crate::item::NewItem;
    use crate::mutation::MutationType;

    fn test_item() -> Item {
        Item::create(
            ItemId::new(),
            NewItem {
                name: "Widget".to_string(),
                code: "WDG".to_string(),
                category_id: CategoryId::new(),
                location_id: LocationId::new(),
                description: "test item".to_string(),
            },
        )
        .unwrap()
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 12).unwrap()
    }

    fn new_mutation(item: &Item, kind: MutationType, amount: i64) -> NewMutation {
        NewMutation {
            item_id: item.id(),
            user_id: UserId::new(),
            kind,
            amount,
            date: test_date(),
            description: "desc".to_string(),
        }
    }

    /// Item with a single addition of `amount` applied.
    fn stocked(amount: i64) -> (Item, Mutation) {
        let item = test_item();
        let entry = plan_create(
            &item,
            MutationId::new(),
            new_mutation(&item, MutationType::Addition, amount),
        )
        .unwrap();
        (entry.item, entry.mutation)
    }

    #[test]
    fn create_addition_increases_stock() {
        let (item, mutation) = stocked(10);
        assert_eq!(item.stock(), 10);
        assert_eq!(mutation.amount(), 10);
        assert_eq!(item.version(), 2);
    }

    #[test]
    fn create_addition_with_negative_amount_is_rejected() {
        let item = test_item();
        let err = plan_create(
            &item,
            MutationId::new(),
            new_mutation(&item, MutationType::Addition, -5),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidAmountSign(_)));
    }

    #[test]
    fn create_subtraction_beyond_stock_is_rejected() {
        let (item, _) = stocked(10);
        let err = plan_create(
            &item,
            MutationId::new(),
            new_mutation(&item, MutationType::Subtraction, -15),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock(_)));
        assert_eq!(item.stock(), 10);
    }

    #[test]
    fn create_subtraction_down_to_zero_is_allowed() {
        let (item, _) = stocked(10);
        let entry = plan_create(
            &item,
            MutationId::new(),
            new_mutation(&item, MutationType::Subtraction, -10),
        )
        .unwrap();
        assert_eq!(entry.item.stock(), 0);
    }

    #[test]
    fn create_for_other_item_is_rejected() {
        let (item, _) = stocked(10);
        let other = test_item();
        let err = plan_create(
            &item,
            MutationId::new(),
            new_mutation(&other, MutationType::Addition, 1),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn update_flip_is_checked_against_reverted_baseline() {
        // stock 10 from one +10; editing it to -3 reverts to 0 and 0 - 3 < 0.
        let (item, mutation) = stocked(10);
        let patch = MutationPatch {
            amount: AmountChange::Changed {
                kind: MutationType::Subtraction,
                amount: -3,
            },
            ..MutationPatch::default()
        };
        let err = plan_update(&item, &mutation, patch).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock(_)));
        assert_eq!(item.stock(), 10);
        assert_eq!(mutation.amount(), 10);
    }

    #[test]
    fn update_amount_replaces_old_contribution() {
        let (item, first) = stocked(10);
        let second = plan_create(
            &item,
            MutationId::new(),
            new_mutation(&item, MutationType::Subtraction, -4),
        )
        .unwrap();
        assert_eq!(second.item.stock(), 6);

        let patch = MutationPatch {
            amount: AmountChange::Changed {
                kind: MutationType::Addition,
                amount: 3,
            },
            ..MutationPatch::default()
        };
        let entry = plan_update(&second.item, &second.mutation, patch).unwrap();
        assert_eq!(entry.item.stock(), 13);
        assert_eq!(entry.mutation.kind(), MutationType::Addition);
        assert_eq!(entry.mutation.amount(), 3);
        assert_eq!(i128::from(entry.item.stock()), ledger_sum([&first, &entry.mutation]));
    }

    #[test]
    fn update_revert_underflow_is_reported() {
        // +10 then -10: editing the +10 would revert stock to -10.
        let (item, first) = stocked(10);
        let drained = plan_create(
            &item,
            MutationId::new(),
            new_mutation(&item, MutationType::Subtraction, -10),
        )
        .unwrap();
        let patch = MutationPatch {
            amount: AmountChange::Changed {
                kind: MutationType::Addition,
                amount: 20,
            },
            ..MutationPatch::default()
        };
        let err = plan_update(&drained.item, &first, patch).unwrap_err();
        assert!(matches!(err, DomainError::RevertUnderflow(_)));
    }

    #[test]
    fn update_details_only_leaves_stock() {
        let (item, mutation) = stocked(10);
        let new_date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let patch = MutationPatch {
            amount: AmountChange::Unchanged,
            date: Some(new_date),
            description: Some("recounted".to_string()),
        };
        let entry = plan_update(&item, &mutation, patch).unwrap();
        assert_eq!(entry.item.stock(), 10);
        assert_eq!(entry.mutation.date(), new_date);
        assert_eq!(entry.mutation.description(), "recounted");
        assert_eq!(entry.item.version(), item.version() + 1);
    }

    #[test]
    fn update_rejects_sign_mismatch() {
        let (item, mutation) = stocked(10);
        let patch = MutationPatch {
            amount: AmountChange::Changed {
                kind: MutationType::Subtraction,
                amount: 2,
            },
            ..MutationPatch::default()
        };
        let err = plan_update(&item, &mutation, patch).unwrap_err();
        assert!(matches!(err, DomainError::InvalidAmountSign(_)));
    }

    #[test]
    fn delete_reverts_stock() {
        let (item, mutation) = stocked(10);
        let reverted = plan_delete(&item, &mutation).unwrap();
        assert_eq!(reverted.stock(), 0);
    }

    #[test]
    fn delete_that_would_underflow_is_rejected() {
        let (item, first) = stocked(10);
        let drained = plan_create(
            &item,
            MutationId::new(),
            new_mutation(&item, MutationType::Subtraction, -7),
        )
        .unwrap();
        let err = plan_delete(&drained.item, &first).unwrap_err();
        assert!(matches!(err, DomainError::RevertUnderflow(_)));
    }

    #[test]
    fn deleting_a_subtraction_restores_stock() {
        let (item, _) = stocked(10);
        let taken = plan_create(
            &item,
            MutationId::new(),
            new_mutation(&item, MutationType::Subtraction, -7),
        )
        .unwrap();
        let restored = plan_delete(&taken.item, &taken.mutation).unwrap();
        assert_eq!(restored.stock(), 10);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Create(bool, i64),
        Update(usize, Option<(bool, i64)>),
        Delete(usize),
    }

    fn kind_of(addition: bool) -> MutationType {
        if addition {
            MutationType::Addition
        } else {
            MutationType::Subtraction
        }
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<bool>(), -20i64..=20).prop_map(|(a, n)| Op::Create(a, n)),
            (any::<usize>(), proptest::option::of((any::<bool>(), -20i64..=20)))
                .prop_map(|(i, c)| Op::Update(i, c)),
            any::<usize>().prop_map(Op::Delete),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: whatever sequence of creates/edits/deletes is attempted,
        /// stock equals the ledger sum and never goes negative.
        #[test]
        fn stock_tracks_ledger_sum(ops in prop::collection::vec(op_strategy(), 1..40)) {
            let mut item = test_item();
            let mut ledger: Vec<Mutation> = Vec::new();

            for op in ops {
                match op {
                    Op::Create(addition, amount) => {
                        let input = new_mutation(&item, kind_of(addition), amount);
                        if let Ok(entry) = plan_create(&item, MutationId::new(), input) {
                            item = entry.item;
                            ledger.push(entry.mutation);
                        }
                    }
                    Op::Update(idx, change) => {
                        if ledger.is_empty() {
                            continue;
                        }
                        let idx = idx % ledger.len();
                        let amount = match change {
                            Some((addition, amount)) => AmountChange::Changed {
                                kind: kind_of(addition),
                                amount,
                            },
                            None => AmountChange::Unchanged,
                        };
                        let patch = MutationPatch { amount, ..MutationPatch::default() };
                        if let Ok(entry) = plan_update(&item, &ledger[idx], patch) {
                            item = entry.item;
                            ledger[idx] = entry.mutation;
                        }
                    }
                    Op::Delete(idx) => {
                        if ledger.is_empty() {
                            continue;
                        }
                        let idx = idx % ledger.len();
                        if let Ok(next) = plan_delete(&item, &ledger[idx]) {
                            item = next;
                            ledger.remove(idx);
                        }
                    }
                }

                prop_assert!(item.stock() >= 0);
                prop_assert_eq!(i128::from(item.stock()), ledger_sum(&ledger));
                for m in &ledger {
                    prop_assert!(m.kind().check_sign(m.amount()).is_ok());
                }
            }
        }
    }
}
