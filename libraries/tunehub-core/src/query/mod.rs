//! Listing query shaping
//!
//! Request parameters flow through [`QueryShaper::shape`] into an immutable
//! [`QuerySpec`], which a [`Collection`] executes in a single round trip.

mod collection;
mod predicate;
pub mod schema;
mod shaper;
mod spec;
mod value;

pub use collection::{Collection, Document};
pub use predicate::{CompareOp, Predicate};
pub use schema::{CollectionSchema, FieldDef, FieldKind, ID_FIELD};
pub use shaper::{QueryShaper, ShaperConfig};
pub use spec::{Filter, Projection, QuerySpec, QuerySpecBuilder, SortDirection, SortKey, DEFAULT_LIMIT};
pub use value::ScalarValue;
