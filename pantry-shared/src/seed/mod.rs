/// Destructive reset-and-repopulate of the whole database
///
/// Steps run strictly in order:
///
/// 1. refuse in production, before touching the store
/// 2. wipe list items, lists, items and users in one transaction
/// 3. create the seed users one at a time; the first is the default owner
/// 4. create the seed items, then the seed lists, for that owner
/// 5. put every seeded item on the first list, concurrently
///
/// Any failure aborts the run with an error. A failure after step 2 leaves
/// a partially seeded database; running the seed again starts over.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use sqlx::PgPool;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::inputs::SignupInput;
use crate::models::item::{CreateItem, Item};
use crate::models::list::{CreateList, List};
use crate::models::list_item::{CreateListItem, ListItem};
use crate::models::owned;
use crate::models::user::User;
use crate::services::{ItemsService, ListItemsService, ListsService, UsersService};
use data::{SEED_ITEMS, SEED_LISTS, SEED_USERS};

pub mod data;

/// Deployment environment, read from `APP_STATE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Test => "test",
            Environment::Production => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown environment '{0}', expected dev, test or prod")]
pub struct UnknownEnvironment(String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

/// Row counts after a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub items: usize,
    pub lists: usize,
    pub list_items: usize,
}

#[derive(Debug, Clone)]
pub struct SeedService {
    pool: PgPool,
    environment: Environment,
    users: UsersService,
    items: ItemsService,
    lists: ListsService,
    list_items: ListItemsService,
}

impl SeedService {
    pub fn new(pool: PgPool, environment: Environment) -> Self {
        Self {
            users: UsersService::new(pool.clone()),
            items: ItemsService::new(pool.clone()),
            lists: ListsService::new(pool.clone()),
            list_items: ListItemsService::new(pool.clone()),
            environment,
            pool,
        }
    }

    /// Runs the whole seed and returns `true`
    ///
    /// # Errors
    ///
    /// `Forbidden` in production. Any store failure aborts the run.
    pub async fn execute_seed(&self) -> ServiceResult<bool> {
        let summary = self.run().await?;

        info!(
            users = summary.users,
            items = summary.items,
            lists = summary.lists,
            list_items = summary.list_items,
            "Seed completed"
        );
        Ok(true)
    }

    /// Same as [`Self::execute_seed`] but reports what was created
    pub async fn run(&self) -> ServiceResult<SeedSummary> {
        if self.environment.is_production() {
            warn!("Seed refused in production");
            return Err(ServiceError::Forbidden(
                "Seed cannot run in production".to_string(),
            ));
        }

        self.wipe().await?;

        let owner = self.load_users().await?;
        let items = self.load_items(&owner).await?;
        let target = self.load_lists(&owner).await?;
        let list_items = self.load_list_items(&target, &items).await?;

        Ok(SeedSummary {
            users: SEED_USERS.len(),
            items: items.len(),
            lists: SEED_LISTS.len(),
            list_items,
        })
    }

    async fn wipe(&self) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        let list_items = ListItem::delete_all(&mut *tx).await?;
        let lists = owned::delete_all::<List, _>(&mut *tx).await?;
        let items = owned::delete_all::<Item, _>(&mut *tx).await?;
        let users = User::delete_all(&mut *tx).await?;

        tx.commit().await?;

        info!(list_items, lists, items, users, "Database wiped");
        Ok(())
    }

    /// Creates the seed users in order and returns the first
    async fn load_users(&self) -> ServiceResult<User> {
        let mut first = None;

        for seed in SEED_USERS {
            let user = self
                .users
                .create_with_roles(
                    SignupInput {
                        email: seed.email.to_string(),
                        full_name: seed.full_name.to_string(),
                        password: seed.password.to_string(),
                    },
                    seed.roles.to_vec(),
                )
                .await?;

            if first.is_none() {
                first = Some(user);
            }
        }

        first.ok_or_else(|| ServiceError::InternalError("No seed users defined".to_string()))
    }

    async fn load_items(&self, owner: &User) -> ServiceResult<Vec<Item>> {
        let mut items = Vec::with_capacity(SEED_ITEMS.len());

        for seed in SEED_ITEMS {
            let data = CreateItem {
                name: seed.name.to_string(),
                quantity_units: seed.quantity_units.map(str::to_string),
            };
            items.push(self.items.create(data, owner).await?);
        }

        Ok(items)
    }

    /// Creates the seed lists in order and returns the first
    async fn load_lists(&self, owner: &User) -> ServiceResult<List> {
        let mut first = None;

        for name in SEED_LISTS {
            let list = self
                .lists
                .create(CreateList { name: name.to_string() }, owner)
                .await?;
            if first.is_none() {
                first = Some(list);
            }
        }

        first.ok_or_else(|| ServiceError::InternalError("No seed lists defined".to_string()))
    }

    /// Links every item to `target` with a random quantity and completion flag
    ///
    /// Inserts run concurrently; all of them are awaited. The first failure
    /// is returned and the remaining tasks are aborted.
    async fn load_list_items(&self, target: &List, items: &[Item]) -> ServiceResult<usize> {
        let mut tasks = JoinSet::new();

        for item in items {
            let (quantity, completed) = {
                let mut rng = rand::thread_rng();
                (rng.gen_range(0..=10), rng.gen_bool(0.5))
            };

            let service = self.list_items.clone();
            let data = CreateListItem {
                list_id: target.id,
                item_id: item.id,
                quantity,
                completed,
            };
            tasks.spawn(async move { service.create(data).await });
        }

        let mut created = 0;
        while let Some(joined) = tasks.join_next().await {
            let result = joined.map_err(|e| {
                error!(error = %e, "Seed list item task panicked or was cancelled");
                ServiceError::InternalError("Please check server logs".to_string())
            })?;
            result?;
            created += 1;
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(" test ".parse::<Environment>().unwrap(), Environment::Test);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_only_production_is_production() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Test.is_production());
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn test_seed_data_shape() {
        assert!(!SEED_USERS.is_empty());
        assert!(!SEED_LISTS.is_empty());
        assert!(SEED_USERS.iter().all(|u| !u.roles.is_empty()));
        assert!(SEED_USERS.iter().all(|u| u.password.len() >= 6));
        assert!(SEED_USERS[0].roles.contains(&crate::models::user::ValidRole::Admin));

        let mut names: Vec<_> = SEED_ITEMS.iter().map(|i| i.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SEED_ITEMS.len());
    }

    #[tokio::test]
    async fn test_production_refused_before_store_access() {
        // A lazy pool never connects until used
        let pool = PgPool::connect_lazy("postgresql://localhost:1/unreachable").unwrap();
        let seed = SeedService::new(pool, Environment::Production);

        let err = seed.execute_seed().await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}
