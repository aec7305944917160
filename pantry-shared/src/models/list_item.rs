/// List item model: the association between a list and an item
///
/// A list item has no owner column of its own. It belongs to whoever owns
/// its list, so every owner-scoped query joins `lists`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE list_items (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     list_id UUID NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
///     item_id UUID NOT NULL REFERENCES items(id) ON DELETE CASCADE,
///     quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (list_id, item_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::substring_pattern;

const LIST_ITEM_COLUMNS: &str =
    "li.id, li.list_id, li.item_id, li.quantity, li.completed, li.created_at, li.updated_at";

/// An item placed on a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: Uuid,
    pub list_id: Uuid,
    pub item_id: Uuid,

    /// Never negative
    pub quantity: i32,

    pub completed: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateListItem {
    pub list_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub completed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateListItem {
    pub list_id: Option<Uuid>,
    pub item_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub completed: Option<bool>,
}

impl ListItem {
    /// Inserts an association without any ownership check
    pub async fn create(pool: &PgPool, data: CreateListItem) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ListItem>(
            r#"
            INSERT INTO list_items AS li (list_id, item_id, quantity, completed)
            VALUES ($1, $2, $3, $4)
            RETURNING li.id, li.list_id, li.item_id, li.quantity, li.completed,
                      li.created_at, li.updated_at
            "#,
        )
        .bind(data.list_id)
        .bind(data.item_id)
        .bind(data.quantity)
        .bind(data.completed)
        .fetch_one(pool)
        .await
    }

    /// Finds a list item whose list belongs to `owner_id`
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ListItem>(&format!(
            r#"
            SELECT {LIST_ITEM_COLUMNS}
            FROM list_items li
            JOIN lists l ON l.id = li.list_id
            WHERE li.id = $1 AND l.user_id = $2
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists the items of one list, optionally filtered by item name
    ///
    /// The caller must have checked that the list belongs to the owner.
    pub async fn list_by_list(
        pool: &PgPool,
        list_id: Uuid,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {LIST_ITEM_COLUMNS} FROM list_items li \
             JOIN items i ON i.id = li.item_id \
             WHERE li.list_id = "
        ));
        query.push_bind(list_id);

        if let Some(search) = search {
            query
                .push(" AND LOWER(i.name) LIKE ")
                .push_bind(substring_pattern(search));
        }
        query
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        query.build_query_as::<ListItem>().fetch_all(pool).await
    }

    /// Applies a partial update to a list item whose list belongs to `owner_id`
    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateListItem,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE list_items AS li SET updated_at = NOW()");

        if let Some(list_id) = data.list_id {
            query.push(", list_id = ").push_bind(list_id);
        }
        if let Some(item_id) = data.item_id {
            query.push(", item_id = ").push_bind(item_id);
        }
        if let Some(quantity) = data.quantity {
            query.push(", quantity = ").push_bind(quantity);
        }
        if let Some(completed) = data.completed {
            query.push(", completed = ").push_bind(completed);
        }

        // Ownership is checked against the list the row points at before the update
        query
            .push(" FROM lists l WHERE l.id = li.list_id AND li.id = ")
            .push_bind(id)
            .push(" AND l.user_id = ")
            .push_bind(owner_id)
            .push(format!(" RETURNING {LIST_ITEM_COLUMNS}"));

        query.build_query_as::<ListItem>().fetch_optional(pool).await
    }

    /// Deletes a list item whose list belongs to `owner_id`
    pub async fn delete_owned(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM list_items li
            USING lists l
            WHERE l.id = li.list_id AND li.id = $1 AND l.user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts the items on a list
    pub async fn count_by_list(pool: &PgPool, list_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM list_items WHERE list_id = $1")
            .bind(list_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts associations referencing `item_id`
    pub async fn count_by_item(pool: &PgPool, item_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM list_items WHERE item_id = $1")
            .bind(item_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Deletes every association. Used by the seed wipe only.
    pub async fn delete_all<'e, E: PgExecutor<'e>>(executor: E) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM list_items").execute(executor).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_default_is_noop() {
        let update = UpdateListItem::default();
        assert!(update.list_id.is_none());
        assert!(update.item_id.is_none());
        assert!(update.quantity.is_none());
        assert!(update.completed.is_none());
    }

    #[test]
    fn test_list_item_serializes_camel_case() {
        let row = ListItem {
            id: Uuid::new_v4(),
            list_id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            quantity: 3,
            completed: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["completed"], true);
        assert!(json.get("listId").is_some());
    }
}
