/// Item model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE items (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     quantity_units VARCHAR(64),
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

/// Something that can be put on a list ("Rice", "Milk")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,

    pub name: String,

    /// Unit for quantities on lists ("kg", "l"); free text
    pub quantity_units: Option<String>,

    /// Owner
    pub user_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an item
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub name: String,
    pub quantity_units: Option<String>,
}

/// Partial update. `quantity_units: Some(None)` clears the unit.
#[derive(Debug, Clone, Default)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub quantity_units: Option<Option<String>>,
}

impl OwnedResource for Item {
    type Create = CreateItem;
    type Update = UpdateItem;

    const KIND: &'static str = "Item";
    const TABLE: &'static str = "items";
    const COLUMNS: &'static str = "id, name, quantity_units, user_id, created_at, updated_at";

    fn id(&self) -> Uuid {
        self.id
    }

    fn push_values<'a>(query: &mut QueryBuilder<'a, Postgres>, data: CreateItem, owner_id: Uuid) {
        query
            .push("(name, quantity_units, user_id) VALUES (")
            .push_bind(data.name)
            .push(", ")
            .push_bind(data.quantity_units)
            .push(", ")
            .push_bind(owner_id)
            .push(")");
    }

    fn push_assignments<'a>(query: &mut QueryBuilder<'a, Postgres>, data: UpdateItem) {
        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(units) = data.quantity_units {
            query.push(", quantity_units = ").push_bind(units);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql_shape() {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("INSERT INTO items ");
        Item::push_values(
            &mut query,
            CreateItem {
                name: "Rice".to_string(),
                quantity_units: None,
            },
            Uuid::new_v4(),
        );

        assert_eq!(
            query.sql(),
            "INSERT INTO items (name, quantity_units, user_id) VALUES ($1, $2, $3)"
        );
    }

    #[test]
    fn test_assignments_skip_absent_fields() {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE items SET updated_at = NOW()");
        Item::push_assignments(
            &mut query,
            UpdateItem {
                quantity_units: Some(None),
                ..Default::default()
            },
        );

        assert_eq!(query.sql(), "UPDATE items SET updated_at = NOW(), quantity_units = $1");
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = Item {
            id: Uuid::new_v4(),
            name: "Milk".to_string(),
            quantity_units: Some("l".to_string()),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["quantityUnits"], "l");
        assert!(json.get("userId").is_some());
    }
}
