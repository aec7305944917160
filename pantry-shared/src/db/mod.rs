/// Database plumbing: connection pool and embedded migrations
///
/// Queries live next to the models in [`crate::models`].

pub mod migrations;
pub mod pool;
