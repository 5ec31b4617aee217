/// Email diagnosis queries: `validateEmail` and `validateEmailsBulk`.
pub mod email;
/// Actix-web handlers serving the schema and the playground.
pub mod handlers;
pub mod health;
pub mod schema;
