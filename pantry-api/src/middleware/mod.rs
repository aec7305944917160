/// Request middleware for the API server
///
/// - `bearer`: extracts the `Authorization: Bearer` token

pub mod bearer;
