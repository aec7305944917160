/// List model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE lists (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     user_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::owned::OwnedResource;

/// A named shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateList {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateList {
    pub name: Option<String>,
}

impl OwnedResource for List {
    type Create = CreateList;
    type Update = UpdateList;

    const KIND: &'static str = "List";
    const TABLE: &'static str = "lists";
    const COLUMNS: &'static str = "id, name, user_id, created_at, updated_at";

    fn id(&self) -> Uuid {
        self.id
    }

    fn push_values<'a>(query: &mut QueryBuilder<'a, Postgres>, data: CreateList, owner_id: Uuid) {
        query
            .push("(name, user_id) VALUES (")
            .push_bind(data.name)
            .push(", ")
            .push_bind(owner_id)
            .push(")");
    }

    fn push_assignments<'a>(query: &mut QueryBuilder<'a, Postgres>, data: UpdateList) {
        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
        }
    }
}
