//! Request parameter shaping
//!
//! Turns the flat `key=value` pairs of a listing request into a
//! [`QuerySpec`]:
//!
//! - `page`, `limit`: page window (malformed values fall back to defaults)
//! - `sort=a,-b`: sort keys, `-` for descending
//! - `fields=a,b` or `fields=-a,-b`: inclusion or exclusion projection
//! - `field=value`: equality
//! - `field[gt|gte|lt|lte]=value`: comparison

use crate::error::{Result, TuneError};
use crate::query::collection::{Collection, Document};
use crate::query::predicate::{CompareOp, Predicate};
use crate::query::schema::CollectionSchema;
use crate::query::spec::{Projection, QuerySpec, SortDirection, DEFAULT_LIMIT};
use crate::query::value::ScalarValue;
use serde::{Deserialize, Serialize};

const PAGE: &str = "page";
const LIMIT: &str = "limit";
const SORT: &str = "sort";
const FIELDS: &str = "fields";

/// Defaults applied when a request leaves pagination out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShaperConfig {
    pub default_page: u32,
    pub default_limit: u32,
    /// Upper bound applied on top of each collection's own ceiling
    pub max_limit: u32,
}

impl Default for ShaperConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_limit: DEFAULT_LIMIT,
            max_limit: 100,
        }
    }
}

/// Builds and runs listing queries from request parameters
#[derive(Debug, Clone, Default)]
pub struct QueryShaper {
    config: ShaperConfig,
}

impl QueryShaper {
    pub fn new(config: ShaperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShaperConfig {
        &self.config
    }

    /// Derive the query plan for `schema` from raw parameters
    pub fn shape(
        &self,
        schema: &'static CollectionSchema,
        params: &[(String, String)],
    ) -> Result<QuerySpec> {
        let page = self.positive_param(params, PAGE, self.config.default_page);
        let limit = self
            .positive_param(params, LIMIT, self.config.default_limit)
            .min(self.config.max_limit);

        let mut builder = QuerySpec::builder(schema).page(page).limit(limit);

        for (key, value) in params {
            match key.as_str() {
                PAGE | LIMIT => {}
                SORT => {
                    for (field, direction) in parse_sort(value) {
                        builder = builder.sort_by(field, direction);
                    }
                }
                FIELDS => builder = builder.project(parse_projection(value)?),
                _ => {
                    let (field, predicate) = parse_filter(schema, key, value)?;
                    builder = builder.filter(field, predicate);
                }
            }
        }

        builder.build()
    }

    /// Shape the parameters and run the resulting plan once against `collection`
    pub async fn execute<C>(&self, collection: &C, params: &[(String, String)]) -> Result<Vec<Document>>
    where
        C: Collection + ?Sized,
    {
        let spec = self.shape(collection.schema(), params)?;
        tracing::debug!(
            collection = spec.schema().name,
            filters = spec.filters().len(),
            page = spec.page(),
            limit = spec.limit(),
            "Executing listing query"
        );
        collection.find(&spec).await
    }

    /// Last occurrence wins; anything that is not a positive integer falls back
    fn positive_param(&self, params: &[(String, String)], key: &str, default: u32) -> u32 {
        let Some((_, raw)) = params.iter().rev().find(|(k, _)| k == key) else {
            return default;
        };
        match raw.trim().parse::<u32>() {
            Ok(value) if value > 0 => value,
            _ => {
                tracing::debug!(param = key, value = %raw, "Ignoring malformed pagination value");
                default
            }
        }
    }
}

fn parse_sort(raw: &str) -> impl Iterator<Item = (&str, SortDirection)> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.strip_prefix('-') {
            Some(field) => (field, SortDirection::Descending),
            None => (segment, SortDirection::Ascending),
        })
}

fn parse_projection(raw: &str) -> Result<Projection> {
    let mut include = Vec::new();
    let mut exclude = Vec::new();

    for segment in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match segment.strip_prefix('-') {
            Some(field) => exclude.push(field.to_string()),
            None => include.push(segment.to_string()),
        }
    }

    match (include.is_empty(), exclude.is_empty()) {
        (true, true) => Ok(Projection::Default),
        (false, true) => Ok(Projection::Include(include)),
        (true, false) => Ok(Projection::Exclude(exclude)),
        (false, false) => Err(TuneError::invalid_query(
            "Field selection cannot mix included and excluded fields",
        )),
    }
}

/// Split `field[op]` keys and coerce the value against the field's kind
fn parse_filter<'k>(
    schema: &'static CollectionSchema,
    key: &'k str,
    raw: &str,
) -> Result<(&'k str, Predicate)> {
    let (name, op) = match key.split_once('[') {
        Some((name, rest)) => {
            let keyword = rest.strip_suffix(']').ok_or_else(|| {
                TuneError::invalid_query(format!("Malformed filter parameter '{key}'"))
            })?;
            (name, Some(CompareOp::from_keyword(keyword)?))
        }
        None => (key, None),
    };

    let field = schema.field(name).ok_or_else(|| {
        TuneError::invalid_query(format!("Unknown field '{}' for {}", name, schema.entity))
    })?;
    let value = ScalarValue::coerce(field, raw)?;

    let predicate = match op {
        Some(op) => Predicate::Compare(op, value),
        None => Predicate::Equals(value),
    };
    Ok((name, predicate))
}
