/// Database models for Pantry
///
/// This module contains all database models and their queries.
///
/// # Models
///
/// - `user`: User accounts, roles and blocking
/// - `owned`: the owner-scoped query pattern shared by lists and items
/// - `list`: Shopping lists (owned)
/// - `item`: Items (owned)
/// - `list_item`: Association between a list and an item
///
/// # Example
///
/// ```no_run
/// use pantry_shared::models::{item::{CreateItem, Item}, owned};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, owner_id: Uuid) -> Result<(), sqlx::Error> {
/// let rice: Item = owned::insert(&pool, CreateItem {
///     name: "Rice".to_string(),
///     quantity_units: Some("kg".to_string()),
/// }, owner_id).await?;
///
/// let matches: Vec<Item> = owned::list(&pool, owner_id, Some("ri"), 10, 0).await?;
/// # Ok(())
/// # }
/// ```

pub mod item;
pub mod list;
pub mod list_item;
pub mod owned;
pub mod user;

/// Builds a `LIKE` pattern matching `search` anywhere, case-insensitively
///
/// The pattern is lowercased to pair with `LOWER(column)`. LIKE wildcards in
/// the input are escaped so they match literally.
pub(crate) fn substring_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
