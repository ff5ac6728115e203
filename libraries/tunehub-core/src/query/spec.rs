//! Query specification and its builder
//!
//! A [`QuerySpec`] is the fully resolved plan for one listing request:
//! filters, sort keys, projected columns and the page window. It is produced
//! by [`QuerySpecBuilder::build`], which checks every field name against the
//! collection schema, and is executed exactly once by a
//! [`Collection`](crate::query::Collection).

use crate::error::{Result, TuneError};
use crate::query::predicate::Predicate;
use crate::query::schema::{CollectionSchema, FieldDef, ID_FIELD};

/// Page size used when neither the caller nor the configuration picks one
pub const DEFAULT_LIMIT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One resolved sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: &'static FieldDef,
    pub direction: SortDirection,
}

/// One resolved filter
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: &'static FieldDef,
    pub predicate: Predicate,
}

/// Requested field selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Projection {
    /// Everything except hidden bookkeeping fields
    #[default]
    Default,
    Include(Vec<String>),
    Exclude(Vec<String>),
}

/// Resolved, immutable listing plan
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    schema: &'static CollectionSchema,
    filters: Vec<Filter>,
    sort: Vec<SortKey>,
    columns: Vec<&'static FieldDef>,
    page: u32,
    limit: u32,
}

impl QuerySpec {
    pub fn builder(schema: &'static CollectionSchema) -> QuerySpecBuilder {
        QuerySpecBuilder {
            schema,
            filters: Vec::new(),
            sort: Vec::new(),
            projection: Projection::Default,
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn schema(&self) -> &'static CollectionSchema {
        self.schema
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn sort(&self) -> &[SortKey] {
        &self.sort
    }

    /// Projected columns, in schema order
    pub fn columns(&self) -> &[&'static FieldDef] {
        &self.columns
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of matching records to pass over before the page starts
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Accumulates a [`QuerySpec`]; every method consumes and returns the builder
#[derive(Debug, Clone)]
#[must_use]
pub struct QuerySpecBuilder {
    schema: &'static CollectionSchema,
    filters: Vec<(String, Predicate)>,
    sort: Vec<(String, SortDirection)>,
    projection: Projection,
    page: u32,
    limit: u32,
}

impl QuerySpecBuilder {
    pub fn filter(mut self, field: impl Into<String>, predicate: Predicate) -> Self {
        self.filters.push((field.into(), predicate));
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push((field.into(), direction));
        self
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Resolve every name against the schema
    pub fn build(self) -> Result<QuerySpec> {
        let schema = self.schema;

        let filters = self
            .filters
            .into_iter()
            .map(|(name, predicate)| resolve_filter(schema, &name, predicate))
            .collect::<Result<Vec<_>>>()?;

        let mut sort: Vec<SortKey> = Vec::with_capacity(self.sort.len());
        for (name, direction) in self.sort {
            let field = lookup(schema, &name)?;
            if !field.sortable || field.hidden {
                return Err(TuneError::invalid_query(format!(
                    "Field '{name}' cannot be used for sorting"
                )));
            }
            // First mention of a field wins
            if sort.iter().all(|key| key.field.name != field.name) {
                sort.push(SortKey { field, direction });
            }
        }
        if sort.is_empty() {
            sort.push(SortKey {
                field: lookup(schema, schema.default_sort)?,
                direction: SortDirection::Descending,
            });
        }

        let columns = resolve_projection(schema, &self.projection)?;

        Ok(QuerySpec {
            schema,
            filters,
            sort,
            columns,
            page: self.page.max(1),
            limit: self.limit.clamp(1, schema.max_limit),
        })
    }
}

fn lookup(schema: &'static CollectionSchema, name: &str) -> Result<&'static FieldDef> {
    schema.field(name).ok_or_else(|| {
        TuneError::invalid_query(format!("Unknown field '{}' for {}", name, schema.entity))
    })
}

fn resolve_filter(
    schema: &'static CollectionSchema,
    name: &str,
    predicate: Predicate,
) -> Result<Filter> {
    let field = lookup(schema, name)?;
    if !field.filterable || field.hidden {
        return Err(TuneError::invalid_query(format!(
            "Field '{name}' cannot be filtered"
        )));
    }
    if let Predicate::Compare(op, _) = &predicate {
        if !field.kind.is_ordered() {
            return Err(TuneError::invalid_query(format!(
                "Operator '{}' is not supported on field '{name}'",
                op.keyword()
            )));
        }
    }
    if !predicate.value().fits(field.kind) {
        return Err(TuneError::invalid_query(format!(
            "Value {} does not match the type of field '{name}'",
            predicate.value()
        )));
    }
    Ok(Filter { field, predicate })
}

fn resolve_projection(
    schema: &'static CollectionSchema,
    projection: &Projection,
) -> Result<Vec<&'static FieldDef>> {
    match projection {
        Projection::Include(names) if !names.is_empty() => {
            for name in names {
                lookup(schema, name)?;
            }
            Ok(schema
                .fields
                .iter()
                .filter(|f| f.name == ID_FIELD || names.iter().any(|n| n == f.name))
                .collect())
        }
        Projection::Exclude(names) if !names.is_empty() => {
            for name in names {
                lookup(schema, name)?;
                if name == ID_FIELD {
                    return Err(TuneError::invalid_query("Field 'id' is always returned"));
                }
            }
            Ok(schema
                .fields
                .iter()
                .filter(|f| !names.iter().any(|n| n == f.name))
                .collect())
        }
        _ => Ok(schema.fields.iter().filter(|f| !f.hidden).collect()),
    }
}
