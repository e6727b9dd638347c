//! Reference data the ledger points at: categories, locations and users.

use serde::Serialize;

use stockledger_core::{CategoryId, DomainError, DomainResult, Entity, LocationId, UserId};

use crate::item::{max_chars, require_text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
}

impl Category {
    pub fn create(id: CategoryId, new: NewCategory) -> DomainResult<Self> {
        require_text("name", &new.name)?;
        max_chars("name", &new.name, 50)?;
        Ok(Self { id, name: new.name })
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}

/// A storage location (warehouse, shelf, room).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocation {
    pub name: String,
    pub address: Option<String>,
}

impl Location {
    pub fn create(id: LocationId, new: NewLocation) -> DomainResult<Self> {
        require_text("name", &new.name)?;
        max_chars("name", &new.name, 100)?;
        if let Some(address) = &new.address {
            max_chars("address", address, 200)?;
        }
        Ok(Self {
            id,
            name: new.name,
            address: new.address,
        })
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> LocationId {
        self.id
    }
}

/// A user that mutations are attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl User {
    /// Email uniqueness is a store concern; this only checks the shape.
    pub fn create(id: UserId, new: NewUser) -> DomainResult<Self> {
        require_text("name", &new.name)?;
        max_chars("name", &new.name, 100)?;

        let email = new.email.trim().to_lowercase();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(DomainError::validation("email must be a valid address")),
        }

        Ok(Self {
            id,
            name: new.name,
            email,
        })
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}
