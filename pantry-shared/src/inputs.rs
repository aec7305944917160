/// Operation inputs
///
/// These are the argument shapes accepted at the entry boundary. Each derives
/// [`validator::Validate`]; the gateway validates them before any service is
/// called, and converts them into the model-level `Create*` / `Update*`
/// types with `From`.
///
/// Field names are camelCase on the wire.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    item::{CreateItem, UpdateItem},
    list::{CreateList, UpdateList},
    list_item::{CreateListItem, UpdateListItem},
    user::ValidRole,
};

/// Marks a field as present, so an explicit `null` becomes `Some(None)`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: i64 = 100;

fn default_limit() -> i64 {
    10
}

/// `LIMIT` / `OFFSET` arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PaginationArgs {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: i64,
}

impl Default for PaginationArgs {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl PaginationArgs {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

/// Optional name filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SearchArgs {
    #[validate(length(max = 255, message = "search must be at most 255 characters"))]
    pub search: Option<String>,
}

impl SearchArgs {
    /// The search term, with blank input treated as absent
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Account registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Admin update of a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    pub id: Uuid,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Full name must not be empty"))]
    pub full_name: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,

    #[validate(length(min = 1, message = "A user needs at least one role"))]
    pub roles: Option<Vec<ValidRole>>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemInput {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 64, message = "Quantity units must be 1-64 characters"))]
    pub quantity_units: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemInput {
    pub id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub name: Option<String>,

    /// Absent leaves the unit alone; `null` clears it
    #[serde(default, deserialize_with = "present")]
    #[validate(length(min = 1, max = 64, message = "Quantity units must be 1-64 characters"))]
    pub quantity_units: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateListInput {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateListInput {
    pub id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListItemInput {
    pub list_id: Uuid,
    pub item_id: Uuid,

    #[serde(default)]
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,

    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListItemInput {
    pub id: Uuid,
    pub list_id: Option<Uuid>,
    pub item_id: Option<Uuid>,

    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: Option<i32>,

    pub completed: Option<bool>,
}

impl From<CreateItemInput> for CreateItem {
    fn from(input: CreateItemInput) -> Self {
        CreateItem {
            name: input.name,
            quantity_units: input.quantity_units,
        }
    }
}

impl From<UpdateItemInput> for UpdateItem {
    fn from(input: UpdateItemInput) -> Self {
        UpdateItem {
            name: input.name,
            quantity_units: input.quantity_units,
        }
    }
}

impl From<CreateListInput> for CreateList {
    fn from(input: CreateListInput) -> Self {
        CreateList { name: input.name }
    }
}

impl From<UpdateListInput> for UpdateList {
    fn from(input: UpdateListInput) -> Self {
        UpdateList { name: input.name }
    }
}

impl From<CreateListItemInput> for CreateListItem {
    fn from(input: CreateListItemInput) -> Self {
        CreateListItem {
            list_id: input.list_id,
            item_id: input.item_id,
            quantity: input.quantity,
            completed: input.completed,
        }
    }
}

impl From<UpdateListItemInput> for UpdateListItem {
    fn from(input: UpdateListItemInput) -> Self {
        UpdateListItem {
            list_id: input.list_id,
            item_id: input.item_id,
            quantity: input.quantity,
            completed: input.completed,
        }
    }
}
