/// HTTP route handlers
///
/// - `health`: liveness and database connectivity
/// - `operations`: the single operation gateway

pub mod health;
pub mod operations;
