use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, Entity, ItemId, MutationId, UserId};

/// Direction of a stock mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationType {
    Addition,
    Subtraction,
}

impl MutationType {
    pub fn as_str(self) -> &'static str {
        match self {
            MutationType::Addition => "addition",
            MutationType::Subtraction => "subtraction",
        }
    }

    /// Additions carry `amount >= 0`, subtractions `amount <= 0`.
    pub fn check_sign(self, amount: i64) -> DomainResult<()> {
        match self {
            MutationType::Addition if amount < 0 => Err(DomainError::InvalidAmountSign(
                "insert positive number for addition type".to_string(),
            )),
            MutationType::Subtraction if amount > 0 => Err(DomainError::InvalidAmountSign(
                "insert negative number for subtraction type".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl core::fmt::Display for MutationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ledger entry: a recorded change to an item's stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mutation {
    id: MutationId,
    item_id: ItemId,
    user_id: UserId,
    #[serde(rename = "type")]
    kind: MutationType,
    amount: i64,
    date: NaiveDate,
    description: String,
}

impl Mutation {
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn kind(&self) -> MutationType {
        self.kind
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn set_amount(&mut self, kind: MutationType, amount: i64) {
        self.kind = kind;
        self.amount = amount;
    }

    pub(crate) fn set_details(&mut self, date: Option<NaiveDate>, description: Option<String>) {
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(description) = description {
            self.description = description;
        }
    }
}

impl Entity for Mutation {
    type Id = MutationId;

    fn id(&self) -> MutationId {
        self.id
    }
}

/// Input for recording a new mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMutation {
    pub item_id: ItemId,
    pub user_id: UserId,
    pub kind: MutationType,
    pub amount: i64,
    pub date: NaiveDate,
    pub description: String,
}

impl NewMutation {
    pub(crate) fn into_mutation(self, id: MutationId) -> Mutation {
        Mutation {
            id,
            item_id: self.item_id,
            user_id: self.user_id,
            kind: self.kind,
            amount: self.amount,
            date: self.date,
            description: self.description,
        }
    }
}

/// Edit of a mutation's type and amount, which always change together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmountChange {
    #[default]
    Unchanged,
    Changed { kind: MutationType, amount: i64 },
}

impl AmountChange {
    /// Build from independently optional request fields.
    ///
    /// Supplying exactly one of them is rejected.
    pub fn from_parts(kind: Option<MutationType>, amount: Option<i64>) -> DomainResult<Self> {
        match (kind, amount) {
            (None, None) => Ok(AmountChange::Unchanged),
            (Some(kind), Some(amount)) => Ok(AmountChange::Changed { kind, amount }),
            _ => Err(DomainError::IncompleteAmountChange),
        }
    }
}

/// Requested edit of an existing mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationPatch {
    pub amount: AmountChange,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_valid_for_both_types() {
        assert!(MutationType::Addition.check_sign(0).is_ok());
        assert!(MutationType::Subtraction.check_sign(0).is_ok());
    }

    #[test]
    fn sign_must_agree_with_type() {
        assert!(matches!(
            MutationType::Addition.check_sign(-5),
            Err(DomainError::InvalidAmountSign(_))
        ));
        assert!(matches!(
            MutationType::Subtraction.check_sign(5),
            Err(DomainError::InvalidAmountSign(_))
        ));
    }

    #[test]
    fn amount_change_requires_both_parts() {
        assert_eq!(
            AmountChange::from_parts(None, None).unwrap(),
            AmountChange::Unchanged
        );
        assert_eq!(
            AmountChange::from_parts(Some(MutationType::Subtraction), None).unwrap_err(),
            DomainError::IncompleteAmountChange
        );
        assert_eq!(
            AmountChange::from_parts(None, Some(4)).unwrap_err(),
            DomainError::IncompleteAmountChange
        );
    }

    #[test]
    fn type_serializes_lowercase_under_type_key() {
        let m = NewMutation {
            item_id: ItemId::new(),
            user_id: UserId::new(),
            kind: MutationType::Subtraction,
            amount: -2,
            date: NaiveDate::from_ymd_opt(2024, 4, 12).unwrap(),
            description: "picked".to_string(),
        }
        .into_mutation(MutationId::new());

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["type"], "subtraction");
        assert_eq!(json["date"], "2024-04-12");
    }
}
