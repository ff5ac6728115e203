//! Listing queries over the catalog tables
//!
//! Column and table names come from the static collection schemas only;
//! every request value is bound as a parameter.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tunehub_core::query::{
    CollectionSchema, FieldDef, FieldKind, Filter, Predicate, ScalarValue, SortDirection,
};
use tunehub_core::types::{Album, Artist, Song};
use tunehub_core::{Collection, Document, QuerySpec, Result};

/// A catalog table exposed through the [`Collection`] seam
#[derive(Debug, Clone)]
pub struct SqliteCollection {
    pool: SqlitePool,
    schema: &'static CollectionSchema,
}

impl SqliteCollection {
    pub fn new(pool: SqlitePool, schema: &'static CollectionSchema) -> Self {
        Self { pool, schema }
    }

    pub fn songs(pool: SqlitePool) -> Self {
        Self::new(pool, &Song::SCHEMA)
    }

    pub fn albums(pool: SqlitePool) -> Self {
        Self::new(pool, &Album::SCHEMA)
    }

    pub fn artists(pool: SqlitePool) -> Self {
        Self::new(pool, &Artist::SCHEMA)
    }
}

#[async_trait]
impl Collection for SqliteCollection {
    fn schema(&self) -> &'static CollectionSchema {
        self.schema
    }

    async fn find(&self, spec: &QuerySpec) -> Result<Vec<Document>> {
        let mut query = select(spec);
        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(|row| decode(row, spec.columns())).collect()
    }
}

/// Filter, then sort, then project, then slice
fn select(spec: &QuerySpec) -> QueryBuilder<'static, Sqlite> {
    let mut query = QueryBuilder::new("SELECT ");

    let mut columns = query.separated(", ");
    for field in spec.columns() {
        columns.push(field.name);
    }

    query.push(" FROM ");
    query.push(spec.schema().name);

    for (i, filter) in spec.filters().iter().enumerate() {
        query.push(if i == 0 { " WHERE " } else { " AND " });
        push_filter(&mut query, filter);
    }

    // rowid breaks ties so equal sort keys keep insertion order
    query.push(" ORDER BY ");
    for key in spec.sort() {
        query.push(key.field.name);
        query.push(match key.direction {
            SortDirection::Ascending => " ASC, ",
            SortDirection::Descending => " DESC, ",
        });
    }
    query.push("rowid ASC");

    query.push(" LIMIT ");
    query.push_bind(i64::from(spec.limit()));
    query.push(" OFFSET ");
    query.push_bind(i64::try_from(spec.skip()).unwrap_or(i64::MAX));

    query
}

fn push_filter(query: &mut QueryBuilder<'static, Sqlite>, filter: &Filter) {
    let column = filter.field.name;
    match (&filter.predicate, filter.field.kind) {
        (Predicate::Equals(value), FieldKind::List) => {
            query.push("EXISTS (SELECT 1 FROM json_each(");
            query.push(column);
            query.push(") WHERE json_each.value = ");
            push_value(query, value);
            query.push(")");
        }
        (Predicate::Equals(value), _) => {
            query.push(column);
            query.push(" = ");
            push_value(query, value);
        }
        (Predicate::Compare(op, value), _) => {
            query.push(column);
            query.push(format_args!(" {} ", op.sql_operator()));
            push_value(query, value);
        }
    }
}

fn push_value(query: &mut QueryBuilder<'static, Sqlite>, value: &ScalarValue) {
    match value {
        ScalarValue::Text(text) => query.push_bind(text.clone()),
        ScalarValue::Integer(n) => query.push_bind(*n),
        ScalarValue::Real(n) => query.push_bind(*n),
        ScalarValue::Bool(b) => query.push_bind(*b),
    };
}

fn decode(row: &SqliteRow, columns: &[&'static FieldDef]) -> Result<Document> {
    let mut document = Document::new();
    for field in columns {
        let name = field.name;
        let value = match field.kind {
            FieldKind::Text | FieldKind::Timestamp => row
                .try_get::<Option<String>, _>(name)?
                .map_or(Value::Null, Value::String),
            FieldKind::Integer => row
                .try_get::<Option<i64>, _>(name)?
                .map_or(Value::Null, Value::from),
            FieldKind::Real => row
                .try_get::<Option<f64>, _>(name)?
                .map_or(Value::Null, Value::from),
            FieldKind::Bool => row
                .try_get::<Option<bool>, _>(name)?
                .map_or(Value::Null, Value::Bool),
            FieldKind::List => match row.try_get::<Option<String>, _>(name)? {
                Some(raw) => serde_json::from_str(&raw)?,
                None => Value::Array(Vec::new()),
            },
        };
        document.insert(name.to_string(), value);
    }
    Ok(document)
}
