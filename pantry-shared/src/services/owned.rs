/// Generic owner-scoped CRUD service
///
/// One implementation serves both [`List`] and [`Item`]. Every method takes
/// the calling user and only ever touches that user's rows; another owner's
/// row yields the same `NotFound` as a missing one.
///
/// # Example
///
/// ```no_run
/// use pantry_shared::inputs::PaginationArgs;
/// use pantry_shared::models::{item::CreateItem, user::User};
/// use pantry_shared::services::ItemsService;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, owner: User) -> Result<(), pantry_shared::error::ServiceError> {
/// let items = ItemsService::new(pool);
/// let rice = items
///     .create(CreateItem { name: "Rice".into(), quantity_units: Some("kg".into()) }, &owner)
///     .await?;
/// let page = items.list(&owner, PaginationArgs::default(), Some("ri")).await?;
/// assert!(page.iter().any(|item| item.id == rice.id));
/// # Ok(())
/// # }
/// ```

use std::marker::PhantomData;

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::inputs::PaginationArgs;
use crate::models::item::Item;
use crate::models::list::List;
use crate::models::owned::{self, OwnedResource};
use crate::models::user::User;

pub struct OwnedResourceService<R> {
    pool: PgPool,
    _resource: PhantomData<fn() -> R>,
}

pub type ListsService = OwnedResourceService<List>;
pub type ItemsService = OwnedResourceService<Item>;

// Derived Clone would require R: Clone
impl<R> Clone for OwnedResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for OwnedResourceService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedResourceService")
            .field("resource", &std::any::type_name::<R>())
            .finish()
    }
}

impl<R: OwnedResource> OwnedResourceService<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }

    /// Creates a row owned by `owner`
    pub async fn create(&self, data: R::Create, owner: &User) -> ServiceResult<R> {
        let row: R = owned::insert(&self.pool, data, owner.id).await?;
        info!(kind = R::KIND, id = %row.id(), owner = %owner.id, "Created");
        Ok(row)
    }

    /// One page of the owner's rows, optionally filtered by name
    pub async fn list(
        &self,
        owner: &User,
        pagination: PaginationArgs,
        search: Option<&str>,
    ) -> ServiceResult<Vec<R>> {
        debug!(
            kind = R::KIND,
            owner = %owner.id,
            limit = pagination.limit,
            offset = pagination.offset,
            "Listing"
        );

        Ok(owned::list::<R>(&self.pool, owner.id, search, pagination.limit, pagination.offset).await?)
    }

    /// # Errors
    ///
    /// `NotFound` when the id doesn't exist or belongs to another owner.
    pub async fn get_one(&self, id: Uuid, owner: &User) -> ServiceResult<R> {
        owned::find::<R>(&self.pool, id, owner.id)
            .await?
            .ok_or_else(|| ServiceError::not_found(R::KIND, id))
    }

    pub async fn update(&self, id: Uuid, data: R::Update, owner: &User) -> ServiceResult<R> {
        self.get_one(id, owner).await?;

        // The row may have been removed between the two statements
        let row: R = owned::update(&self.pool, id, owner.id, data)
            .await?
            .ok_or_else(|| ServiceError::not_found(R::KIND, id))?;

        info!(kind = R::KIND, id = %id, owner = %owner.id, "Updated");
        Ok(row)
    }

    /// Deletes the row and returns it as it was before deletion
    pub async fn remove(&self, id: Uuid, owner: &User) -> ServiceResult<R> {
        let snapshot = self.get_one(id, owner).await?;

        if !owned::delete::<R>(&self.pool, id, owner.id).await? {
            return Err(ServiceError::not_found(R::KIND, id));
        }

        info!(kind = R::KIND, id = %id, owner = %owner.id, "Removed");
        Ok(snapshot)
    }

    pub async fn count_by_owner(&self, owner: &User) -> ServiceResult<i64> {
        Ok(owned::count_by_owner::<R>(&self.pool, owner.id).await?)
    }

    /// Same as [`Self::count_by_owner`] for an arbitrary user id
    pub async fn count_for_user(&self, user_id: Uuid) -> ServiceResult<i64> {
        Ok(owned::count_by_owner::<R>(&self.pool, user_id).await?)
    }

    /// Total rows across all owners
    pub async fn count_all(&self) -> ServiceResult<i64> {
        Ok(owned::count_all::<R>(&self.pool).await?)
    }
}
