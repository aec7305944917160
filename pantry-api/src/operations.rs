/// The operation gateway
///
/// Clients send one envelope to `POST /v1/operations`:
///
/// ```json
/// { "operation": "items", "args": { "limit": 5, "search": "ri" } }
/// ```
///
/// The envelope decodes into [`Operation`]. [`execute`] validates the
/// arguments, authenticates the caller when the operation needs one, checks
/// roles and calls the matching service.
///
/// Operations without arguments (`revalidate`, `itemCount`, `listCount`,
/// `executeSeed`) accept a missing `args`, `null` or `{}`.

use pantry_shared::auth::authorization::require_roles;
use pantry_shared::inputs::{
    CreateItemInput, CreateListInput, CreateListItemInput, LoginInput, PaginationArgs,
    SearchArgs, SignupInput, UpdateItemInput, UpdateListInput, UpdateListItemInput,
    UpdateUserInput,
};
use pantry_shared::models::item::Item;
use pantry_shared::models::list::List;
use pantry_shared::models::list_item::ListItem;
use pantry_shared::models::user::{User, ValidRole};
use pantry_shared::services::AuthResponse;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::{validated, ApiError, ApiResult};

/// Roles allowed to run the user administration operations
const ADMIN_ONLY: &[ValidRole] = &[ValidRole::Admin];

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", content = "args", rename_all = "camelCase")]
pub enum Operation {
    // Auth
    Signup(SignupInput),
    Login(LoginInput),
    Revalidate(NoArgs),

    // User administration
    Users(UsersArgs),
    User(IdArgs),
    UpdateUser(UpdateUserInput),
    BlockUser(IdArgs),
    UserItemCount(IdArgs),
    UserListCount(IdArgs),

    // Items
    CreateItem(CreateItemInput),
    Items(PageArgs),
    Item(IdArgs),
    UpdateItem(UpdateItemInput),
    RemoveItem(IdArgs),
    ItemCount(NoArgs),

    // Lists
    CreateList(CreateListInput),
    Lists(PageArgs),
    List(IdArgs),
    UpdateList(UpdateListInput),
    RemoveList(IdArgs),
    ListCount(NoArgs),

    // List items
    CreateListItem(CreateListItemInput),
    ListItems(ListItemsArgs),
    ListItem(IdArgs),
    UpdateListItem(UpdateListItemInput),
    RemoveListItem(IdArgs),
    ListItemCount(ListIdArgs),

    // Maintenance
    ExecuteSeed(NoArgs),
}

/// Arguments of an operation that takes none
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoArgs;

impl<'de> Deserialize<'de> for NoArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Extra keys are ignored, as for every other argument object
        #[derive(Deserialize)]
        struct Empty {}

        Option::<Empty>::deserialize(deserializer).map(|_| NoArgs)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IdArgs {
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIdArgs {
    pub list_id: Uuid,
}

/// Pagination plus optional name search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageArgs {
    #[serde(flatten)]
    pub pagination: PaginationArgs,

    #[serde(flatten)]
    pub search: SearchArgs,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersArgs {
    /// Empty means every role
    #[serde(default)]
    pub roles: Vec<ValidRole>,

    #[serde(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsArgs {
    pub list_id: Uuid,

    #[serde(flatten)]
    pub page: PageArgs,
}

/// Result of an operation, serialized as-is under `data`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Auth(AuthResponse),
    User(User),
    Users(Vec<User>),
    Item(Item),
    Items(Vec<Item>),
    List(List),
    Lists(Vec<List>),
    ListItem(ListItem),
    ListItems(Vec<ListItem>),
    Count(i64),
    Done(bool),
}

impl Operation {
    /// Wire name, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Signup(_) => "signup",
            Operation::Login(_) => "login",
            Operation::Revalidate(_) => "revalidate",
            Operation::Users(_) => "users",
            Operation::User(_) => "user",
            Operation::UpdateUser(_) => "updateUser",
            Operation::BlockUser(_) => "blockUser",
            Operation::UserItemCount(_) => "userItemCount",
            Operation::UserListCount(_) => "userListCount",
            Operation::CreateItem(_) => "createItem",
            Operation::Items(_) => "items",
            Operation::Item(_) => "item",
            Operation::UpdateItem(_) => "updateItem",
            Operation::RemoveItem(_) => "removeItem",
            Operation::ItemCount(_) => "itemCount",
            Operation::CreateList(_) => "createList",
            Operation::Lists(_) => "lists",
            Operation::List(_) => "list",
            Operation::UpdateList(_) => "updateList",
            Operation::RemoveList(_) => "removeList",
            Operation::ListCount(_) => "listCount",
            Operation::CreateListItem(_) => "createListItem",
            Operation::ListItems(_) => "listItems",
            Operation::ListItem(_) => "listItem",
            Operation::UpdateListItem(_) => "updateListItem",
            Operation::RemoveListItem(_) => "removeListItem",
            Operation::ListItemCount(_) => "listItemCount",
            Operation::ExecuteSeed(_) => "executeSeed",
        }
    }

    /// Operations anyone may call without a token
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Operation::Signup(_) | Operation::Login(_) | Operation::ExecuteSeed(_)
        )
    }

    /// Roles required on top of being authenticated
    pub fn required_roles(&self) -> &'static [ValidRole] {
        match self {
            Operation::Users(_)
            | Operation::User(_)
            | Operation::UpdateUser(_)
            | Operation::BlockUser(_)
            | Operation::UserItemCount(_)
            | Operation::UserListCount(_) => ADMIN_ONLY,
            _ => &[],
        }
    }
}

/// Resolves the caller for a protected operation
async fn authenticate(state: &AppState, token: Option<&str>) -> ApiResult<User> {
    let token = token
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;
    Ok(state.auth.authenticate(token).await?)
}

fn page(args: PageArgs) -> ApiResult<(PaginationArgs, SearchArgs)> {
    Ok((validated(args.pagination)?, validated(args.search)?))
}

/// Runs one operation on behalf of the bearer of `token`
pub async fn execute(
    state: &AppState,
    operation: Operation,
    token: Option<&str>,
) -> ApiResult<OperationOutput> {
    debug!(operation = operation.name(), "Executing operation");

    if operation.is_public() {
        return execute_public(state, operation).await;
    }

    let caller = authenticate(state, token).await?;
    require_roles(&caller, operation.required_roles())?;

    let output = match operation {
        Operation::Revalidate(_) => OperationOutput::Auth(state.auth.revalidate(&caller)?),

        Operation::Users(args) => {
            let (pagination, search) = page(args.page)?;
            OperationOutput::Users(
                state
                    .users
                    .list(&args.roles, pagination, search.term())
                    .await?,
            )
        }
        Operation::User(IdArgs { id }) => OperationOutput::User(state.users.find_by_id(id).await?),
        Operation::UpdateUser(input) => {
            let input = validated(input)?;
            OperationOutput::User(state.users.update(input, &caller).await?)
        }
        Operation::BlockUser(IdArgs { id }) => {
            OperationOutput::User(state.users.block(id, &caller).await?)
        }
        Operation::UserItemCount(IdArgs { id }) => {
            OperationOutput::Count(state.items.count_for_user(id).await?)
        }
        Operation::UserListCount(IdArgs { id }) => {
            OperationOutput::Count(state.lists.count_for_user(id).await?)
        }

        Operation::CreateItem(input) => {
            let input = validated(input)?;
            OperationOutput::Item(state.items.create(input.into(), &caller).await?)
        }
        Operation::Items(args) => {
            let (pagination, search) = page(args)?;
            OperationOutput::Items(state.items.list(&caller, pagination, search.term()).await?)
        }
        Operation::Item(IdArgs { id }) => OperationOutput::Item(state.items.get_one(id, &caller).await?),
        Operation::UpdateItem(input) => {
            let input = validated(input)?;
            let id = input.id;
            OperationOutput::Item(state.items.update(id, input.into(), &caller).await?)
        }
        Operation::RemoveItem(IdArgs { id }) => {
            OperationOutput::Item(state.items.remove(id, &caller).await?)
        }
        Operation::ItemCount(_) => OperationOutput::Count(state.items.count_by_owner(&caller).await?),

        Operation::CreateList(input) => {
            let input = validated(input)?;
            OperationOutput::List(state.lists.create(input.into(), &caller).await?)
        }
        Operation::Lists(args) => {
            let (pagination, search) = page(args)?;
            OperationOutput::Lists(state.lists.list(&caller, pagination, search.term()).await?)
        }
        Operation::List(IdArgs { id }) => OperationOutput::List(state.lists.get_one(id, &caller).await?),
        Operation::UpdateList(input) => {
            let input = validated(input)?;
            let id = input.id;
            OperationOutput::List(state.lists.update(id, input.into(), &caller).await?)
        }
        Operation::RemoveList(IdArgs { id }) => {
            OperationOutput::List(state.lists.remove(id, &caller).await?)
        }
        Operation::ListCount(_) => OperationOutput::Count(state.lists.count_by_owner(&caller).await?),

        Operation::CreateListItem(input) => {
            let input = validated(input)?;
            OperationOutput::ListItem(
                state
                    .list_items
                    .create_for_owner(input.into(), &caller)
                    .await?,
            )
        }
        Operation::ListItems(args) => {
            let (pagination, search) = page(args.page)?;
            OperationOutput::ListItems(
                state
                    .list_items
                    .list_by_list(args.list_id, &caller, pagination, search.term())
                    .await?,
            )
        }
        Operation::ListItem(IdArgs { id }) => {
            OperationOutput::ListItem(state.list_items.get_one(id, &caller).await?)
        }
        Operation::UpdateListItem(input) => {
            let input = validated(input)?;
            let id = input.id;
            OperationOutput::ListItem(state.list_items.update(id, input.into(), &caller).await?)
        }
        Operation::RemoveListItem(IdArgs { id }) => {
            OperationOutput::ListItem(state.list_items.remove(id, &caller).await?)
        }
        Operation::ListItemCount(ListIdArgs { list_id }) => {
            OperationOutput::Count(state.list_items.count_by_list(list_id, &caller).await?)
        }

        public @ (Operation::Signup(_) | Operation::Login(_) | Operation::ExecuteSeed(_)) => {
            return execute_public(state, public).await
        }
    };

    Ok(output)
}

async fn execute_public(state: &AppState, operation: Operation) -> ApiResult<OperationOutput> {
    match operation {
        Operation::Signup(input) => {
            let input = validated(input)?;
            Ok(OperationOutput::Auth(state.auth.signup(input).await?))
        }
        Operation::Login(input) => {
            let input = validated(input)?;
            Ok(OperationOutput::Auth(state.auth.login(input).await?))
        }
        Operation::ExecuteSeed(_) => Ok(OperationOutput::Done(state.seed.execute_seed().await?)),
        other => Err(ApiError::InternalError(format!(
            "{} is not a public operation",
            other.name()
        ))),
    }
}
