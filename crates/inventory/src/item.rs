use serde::Serialize;

use stockledger_core::{CategoryId, DomainError, DomainResult, Entity, ItemId, LocationId};

pub(crate) const NAME_MAX: usize = 50;
pub(crate) const CODE_MAX: usize = 4;

/// A stocked item.
///
/// `stock` is a cached aggregate of the item's mutation ledger and is only
/// changed through the functions in [`crate::ledger`]. `version` increases by
/// one on every revision and backs optimistic concurrency in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    id: ItemId,
    name: String,
    code: String,
    stock: i64,
    category_id: CategoryId,
    location_id: LocationId,
    description: String,
    version: u64,
}

/// Input for registering a new item. Stock always starts at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub code: String,
    pub category_id: CategoryId,
    pub location_id: LocationId,
    pub description: String,
}

/// Descriptive fields of an item that may be edited outside the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
    pub description: Option<String>,
}

impl Item {
    pub fn create(id: ItemId, new: NewItem) -> DomainResult<Self> {
        validate_name(&new.name)?;
        validate_code(&new.code)?;
        require_text("description", &new.description)?;

        Ok(Self {
            id,
            name: new.name,
            code: new.code,
            stock: 0,
            category_id: new.category_id,
            location_id: new.location_id,
            description: new.description,
            version: 1,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn location_id(&self) -> LocationId {
        self.location_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply an edit of descriptive fields. Never touches `stock`.
    pub fn revise_details(&self, patch: ItemPatch) -> DomainResult<Self> {
        let mut next = self.clone();
        if let Some(name) = patch.name {
            validate_name(&name)?;
            next.name = name;
        }
        if let Some(code) = patch.code {
            validate_code(&code)?;
            next.code = code;
        }
        if let Some(category_id) = patch.category_id {
            next.category_id = category_id;
        }
        if let Some(location_id) = patch.location_id {
            next.location_id = location_id;
        }
        if let Some(description) = patch.description {
            require_text("description", &description)?;
            next.description = description;
        }
        next.version += 1;
        Ok(next)
    }

    /// Next revision of this item carrying `stock`.
    pub(crate) fn with_stock(&self, stock: i64) -> Self {
        let mut next = self.clone();
        next.stock = stock;
        next.version += 1;
        next
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    require_text("name", name)?;
    max_chars("name", name, NAME_MAX)
}

fn validate_code(code: &str) -> DomainResult<()> {
    require_text("code", code)?;
    max_chars("code", code, CODE_MAX)
}

pub(crate) fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub(crate) fn max_chars(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}
