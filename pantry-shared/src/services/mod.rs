/// Business services
///
/// Services hold a [`sqlx::PgPool`] (and any collaborators) and are cheap to
/// clone. Each method enforces ownership or role constraints, runs its query
/// and returns a typed [`crate::error::ServiceError`] on failure.
///
/// - [`users::UsersService`]: user directory
/// - [`owned::OwnedResourceService`]: owner-scoped CRUD for lists and items
/// - [`list_items::ListItemsService`]: list/item associations
/// - [`auth::AuthService`]: signup, login and token resolution

pub mod auth;
pub mod list_items;
pub mod owned;
pub mod users;

pub use auth::{AuthResponse, AuthService};
pub use list_items::ListItemsService;
pub use owned::{ItemsService, ListsService, OwnedResourceService};
pub use users::UsersService;
