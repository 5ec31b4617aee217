use super::email::EmailQuery;
use super::health::HealthQuery;
use crate::validation::dnsmx::DnsCollaborator;
use async_graphql::{EmptyMutation, EmptySubscription, MergedObject, Schema};
use std::sync::Arc;

/// Root query type: health checks and email diagnosis side by side.
#[derive(MergedObject, Default)]
pub struct QueryRoot(HealthQuery, EmailQuery);

/// Main GraphQL Schema Definition
///
/// # Type Parameters
/// - `QueryRoot`: Root query type containing all available query operations
/// - `EmptyMutation`: Placeholder for mutation operations (currently unused)
/// - `EmptySubscription`: Placeholder for subscription operations (currently unused)
pub type AppSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Creates the GraphQL schema.
///
/// `dns` is stored as schema data and answers the lookups of queries that set
/// `checkDns`.
///
/// # Example
///
/// ```rust,no_run
/// use email_diagnosis::graphql::schema::create_schema;
/// use email_diagnosis::validation::dnsmx::TrustDnsCollaborator;
/// use std::sync::Arc;
///
/// let schema = create_schema(Arc::new(TrustDnsCollaborator::default()));
/// ```
pub fn create_schema(dns: Arc<dyn DnsCollaborator>) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        EmptyMutation::default(),
        EmptySubscription::default(),
    )
    .data(dns)
    .finish()
}
