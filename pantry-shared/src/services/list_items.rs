/// Associations between lists and items
///
/// A list item is owned through its list. Creating or re-pointing one also
/// requires the referenced item to belong to the same user.

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::owned::{ItemsService, ListsService};
use crate::error::{ServiceError, ServiceResult};
use crate::inputs::PaginationArgs;
use crate::models::list_item::{CreateListItem, ListItem, UpdateListItem};
use crate::models::user::User;

const KIND: &str = "ListItem";

#[derive(Debug, Clone)]
pub struct ListItemsService {
    pool: PgPool,
    lists: ListsService,
    items: ItemsService,
}

impl ListItemsService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            lists: ListsService::new(pool.clone()),
            items: ItemsService::new(pool.clone()),
            pool,
        }
    }

    /// Inserts an association without checking who owns the list or item
    pub async fn create(&self, data: CreateListItem) -> ServiceResult<ListItem> {
        let (list_id, item_id) = (data.list_id, data.item_id);

        let list_item = ListItem::create(&self.pool, data)
            .await
            .map_err(|e| duplicate_pair(e, list_id, item_id))?;

        debug!(id = %list_item.id, list_id = %list_id, item_id = %item_id, "List item created");
        Ok(list_item)
    }

    /// Puts one of the owner's items on one of the owner's lists
    ///
    /// # Errors
    ///
    /// - `NotFound` if either the list or the item is not the owner's
    /// - `Conflict` if the item is already on the list
    pub async fn create_for_owner(
        &self,
        data: CreateListItem,
        owner: &User,
    ) -> ServiceResult<ListItem> {
        self.lists.get_one(data.list_id, owner).await?;
        self.items.get_one(data.item_id, owner).await?;

        let list_item = self.create(data).await?;
        info!(id = %list_item.id, owner = %owner.id, "List item added");
        Ok(list_item)
    }

    /// Items on one of the owner's lists, optionally filtered by item name
    pub async fn list_by_list(
        &self,
        list_id: Uuid,
        owner: &User,
        pagination: PaginationArgs,
        search: Option<&str>,
    ) -> ServiceResult<Vec<ListItem>> {
        self.lists.get_one(list_id, owner).await?;

        Ok(ListItem::list_by_list(
            &self.pool,
            list_id,
            search,
            pagination.limit,
            pagination.offset,
        )
        .await?)
    }

    pub async fn get_one(&self, id: Uuid, owner: &User) -> ServiceResult<ListItem> {
        ListItem::find_owned(&self.pool, id, owner.id)
            .await?
            .ok_or_else(|| ServiceError::not_found(KIND, id))
    }

    /// Patches quantity, completion or the referenced list/item
    pub async fn update(
        &self,
        id: Uuid,
        data: UpdateListItem,
        owner: &User,
    ) -> ServiceResult<ListItem> {
        let current = self.get_one(id, owner).await?;

        if let Some(list_id) = data.list_id {
            self.lists.get_one(list_id, owner).await?;
        }
        if let Some(item_id) = data.item_id {
            self.items.get_one(item_id, owner).await?;
        }

        let list_id = data.list_id.unwrap_or(current.list_id);
        let item_id = data.item_id.unwrap_or(current.item_id);

        let list_item = ListItem::update_owned(&self.pool, id, owner.id, data)
            .await
            .map_err(|e| duplicate_pair(e, list_id, item_id))?
            .ok_or_else(|| ServiceError::not_found(KIND, id))?;

        info!(id = %id, owner = %owner.id, "List item updated");
        Ok(list_item)
    }

    /// Deletes the association and returns it as it was
    pub async fn remove(&self, id: Uuid, owner: &User) -> ServiceResult<ListItem> {
        let snapshot = self.get_one(id, owner).await?;

        if !ListItem::delete_owned(&self.pool, id, owner.id).await? {
            return Err(ServiceError::not_found(KIND, id));
        }

        info!(id = %id, owner = %owner.id, "List item removed");
        Ok(snapshot)
    }

    pub async fn count_by_list(&self, list_id: Uuid, owner: &User) -> ServiceResult<i64> {
        self.lists.get_one(list_id, owner).await?;
        Ok(ListItem::count_by_list(&self.pool, list_id).await?)
    }

    /// Associations pointing at `item_id`, regardless of owner
    pub async fn count_by_item(&self, item_id: Uuid) -> ServiceResult<i64> {
        Ok(ListItem::count_by_item(&self.pool, item_id).await?)
    }
}

fn duplicate_pair(err: sqlx::Error, list_id: Uuid, item_id: Uuid) -> ServiceError {
    match ServiceError::from(err) {
        ServiceError::Conflict(_) => ServiceError::Conflict(format!(
            "Item {} is already on list {}",
            item_id, list_id
        )),
        other => other,
    }
}
