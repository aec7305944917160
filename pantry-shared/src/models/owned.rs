/// Owner-scoped queries shared by every owned resource
///
/// Lists and items have the same shape: a row with an `id`, a searchable
/// `name` and a `user_id` owner column. [`OwnedResource`] describes the
/// per-table parts (columns, insert values, patch assignments) and the
/// functions in this module compose the rest.
///
/// Every read, update and delete filters on `user_id` inside the SQL
/// statement itself. A row owned by someone else is indistinguishable from
/// a missing row.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::substring_pattern;

/// A table whose rows belong to exactly one user
pub trait OwnedResource: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    /// Creation input
    type Create: Send;

    /// Partial update input
    type Update: Send;

    /// Human-readable name used in error messages ("List", "Item")
    const KIND: &'static str;

    /// Table name
    const TABLE: &'static str;

    /// Column list for SELECT / RETURNING
    const COLUMNS: &'static str;

    fn id(&self) -> Uuid;

    /// Pushes `(cols, user_id) VALUES (.., owner)` for an INSERT
    fn push_values<'a>(query: &mut QueryBuilder<'a, Postgres>, data: Self::Create, owner_id: Uuid);

    /// Pushes `, col = value` for every field present in `data`
    fn push_assignments<'a>(query: &mut QueryBuilder<'a, Postgres>, data: Self::Update);
}

/// Inserts a row stamped with `owner_id`
pub async fn insert<R: OwnedResource>(
    pool: &PgPool,
    data: R::Create,
    owner_id: Uuid,
) -> Result<R, sqlx::Error> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!("INSERT INTO {} ", R::TABLE));
    R::push_values(&mut query, data, owner_id);
    query.push(format!(" RETURNING {}", R::COLUMNS));

    query.build_query_as::<R>().fetch_one(pool).await
}

/// Finds a row by id, only if it belongs to `owner_id`
pub async fn find<R: OwnedResource>(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<R>, sqlx::Error> {
    sqlx::query_as::<_, R>(&format!(
        "SELECT {} FROM {} WHERE id = $1 AND user_id = $2",
        R::COLUMNS,
        R::TABLE
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
}

/// Lists rows of `owner_id`, optionally filtered by a name substring
///
/// Filtering and pagination happen in a single statement. No ORDER BY is
/// applied.
pub async fn list<R: OwnedResource>(
    pool: &PgPool,
    owner_id: Uuid,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<R>, sqlx::Error> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {} FROM {} WHERE user_id = ",
        R::COLUMNS,
        R::TABLE
    ));
    query.push_bind(owner_id);

    if let Some(search) = search {
        query
            .push(" AND LOWER(name) LIKE ")
            .push_bind(substring_pattern(search));
    }
    query
        .push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    query.build_query_as::<R>().fetch_all(pool).await
}

/// Applies a partial update to a row of `owner_id`
///
/// Returns None if no row matched.
pub async fn update<R: OwnedResource>(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    data: R::Update,
) -> Result<Option<R>, sqlx::Error> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("UPDATE {} SET updated_at = NOW()", R::TABLE));
    R::push_assignments(&mut query, data);
    query
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" AND user_id = ")
        .push_bind(owner_id)
        .push(format!(" RETURNING {}", R::COLUMNS));

    query.build_query_as::<R>().fetch_optional(pool).await
}

/// Deletes a row of `owner_id`, returning true if one was removed
pub async fn delete<R: OwnedResource>(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&format!(
        "DELETE FROM {} WHERE id = $1 AND user_id = $2",
        R::TABLE
    ))
    .bind(id)
    .bind(owner_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Counts rows belonging to `owner_id`
pub async fn count_by_owner<R: OwnedResource>(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as(&format!("SELECT COUNT(*) FROM {} WHERE user_id = $1", R::TABLE))
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

/// Counts every row of the table regardless of owner
pub async fn count_all<R: OwnedResource>(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", R::TABLE))
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Deletes every row of the table. Used by the seed wipe only.
pub async fn delete_all<'e, R: OwnedResource, E: PgExecutor<'e>>(
    executor: E,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(&format!("DELETE FROM {}", R::TABLE))
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
