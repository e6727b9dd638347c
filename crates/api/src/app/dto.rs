use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use stockledger_core::{CategoryId, DomainResult, ItemId, LocationId, UserId};
use stockledger_inventory::{
    AmountChange, Item, ItemPatch, LedgerEntry, Mutation, MutationPatch, MutationType,
    NewCategory, NewItem, NewLocation, NewMutation, NewUser,
};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateMutationRequest {
    pub item_id: ItemId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: MutationType,
    pub amount: i64,
    pub date: NaiveDate,
    pub description: String,
}

impl From<CreateMutationRequest> for NewMutation {
    fn from(body: CreateMutationRequest) -> Self {
        NewMutation {
            item_id: body.item_id,
            user_id: body.user_id,
            kind: body.kind,
            amount: body.amount,
            date: body.date,
            description: body.description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMutationRequest {
    #[serde(rename = "type")]
    pub kind: Option<MutationType>,
    pub amount: Option<i64>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl UpdateMutationRequest {
    /// Fails when only one of `type`/`amount` is present.
    pub fn into_patch(self) -> DomainResult<MutationPatch> {
        Ok(MutationPatch {
            amount: AmountChange::from_parts(self.kind, self.amount)?,
            date: self.date,
            description: self.description,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListMutationsQuery {
    pub item_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub code: String,
    pub category_id: CategoryId,
    pub location_id: LocationId,
    pub description: String,
}

impl From<CreateItemRequest> for NewItem {
    fn from(body: CreateItemRequest) -> Self {
        NewItem {
            name: body.name,
            code: body.code,
            category_id: body.category_id,
            location_id: body.location_id,
            description: body.description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
    pub description: Option<String>,
}

impl From<UpdateItemRequest> for ItemPatch {
    fn from(body: UpdateItemRequest) -> Self {
        ItemPatch {
            name: body.name,
            code: body.code,
            category_id: body.category_id,
            location_id: body.location_id,
            description: body.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(body: CreateCategoryRequest) -> Self {
        NewCategory { name: body.name }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub name: String,
    pub address: Option<String>,
}

impl From<CreateLocationRequest> for NewLocation {
    fn from(body: CreateLocationRequest) -> Self {
        NewLocation {
            name: body.name,
            address: body.address,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
}

impl From<RegisterUserRequest> for NewUser {
    fn from(body: RegisterUserRequest) -> Self {
        NewUser {
            name: body.name,
            email: body.email,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// `data` of every ledger write: the item after the write and the mutation.
#[derive(Debug, Serialize)]
pub struct LedgerEntryResponse {
    pub item: Item,
    pub mutation: Mutation,
}

impl From<LedgerEntry> for LedgerEntryResponse {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            item: entry.item,
            mutation: entry.mutation,
        }
    }
}

/// Success envelope: `{code, message, data}`.
pub fn json_ok(message: &str, data: impl Serialize) -> axum::response::Response {
    (
        StatusCode::OK,
        axum::Json(json!({
            "code": StatusCode::OK.as_u16(),
            "message": message,
            "data": data,
        })),
    )
        .into_response()
}
