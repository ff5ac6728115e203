//! Static collection schemas
//!
//! A schema is the whitelist the query shaper checks request field names
//! against. Field names double as storage column names, so nothing outside a
//! schema ever reaches a query.

/// Storage kind of a field, used to coerce raw request values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Real,
    Bool,
    /// Canonical RFC 3339 UTC string, see [`crate::types::timestamp`]
    Timestamp,
    /// JSON array of strings; equality means "contains"
    List,
}

impl FieldKind {
    /// Whether ordering comparisons (`gt`, `lte`, ...) make sense for this kind
    pub fn is_ordered(self) -> bool {
        !matches!(self, FieldKind::Bool | FieldKind::List)
    }
}

/// One field of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub filterable: bool,
    pub sortable: bool,
    /// Internal bookkeeping, left out of the default projection
    pub hidden: bool,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            filterable: true,
            sortable: !matches!(kind, FieldKind::List),
            hidden: false,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub const fn real(name: &'static str) -> Self {
        Self::new(name, FieldKind::Real)
    }

    pub const fn timestamp(name: &'static str) -> Self {
        Self::new(name, FieldKind::Timestamp)
    }

    pub const fn list(name: &'static str) -> Self {
        Self::new(name, FieldKind::List)
    }

    pub const fn hidden(self) -> Self {
        Self {
            hidden: true,
            ..self
        }
    }

    pub const fn opaque(self) -> Self {
        Self {
            filterable: false,
            sortable: false,
            ..self
        }
    }
}

/// Schema of a listable collection
#[derive(Debug, PartialEq, Eq)]
pub struct CollectionSchema {
    /// Table / collection name
    pub name: &'static str,
    /// Human readable entity name used in error messages
    pub entity: &'static str,
    pub fields: &'static [FieldDef],
    /// "Most recent" field used when no sort is requested
    pub default_sort: &'static str,
    /// Hard ceiling on page size for this collection
    pub max_limit: u32,
}

/// Every collection exposes its primary key under this name
pub const ID_FIELD: &str = "id";

impl CollectionSchema {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
