/// Collection abstraction consumed by the query shaper
use crate::error::Result;
use crate::query::schema::CollectionSchema;
use crate::query::spec::QuerySpec;
use async_trait::async_trait;

/// A projected record, keyed by field name
pub type Document = serde_json::Map<String, serde_json::Value>;

/// A queryable collection of records
///
/// Implementations execute a fully resolved [`QuerySpec`] in one round trip,
/// applying filter, sort, projection and the page window in that order.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Schema the collection's specs are resolved against
    fn schema(&self) -> &'static CollectionSchema;

    /// Execute the plan and materialize the page
    async fn find(&self, spec: &QuerySpec) -> Result<Vec<Document>>;
}
