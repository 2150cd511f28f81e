//! Live schema introspection.
//!
//! The reconciler never reads catalog tables itself; it goes through the
//! [`Introspector`] seam, so tests can stand in an in-memory schema and the
//! Postgres implementation stays a set of thin catalog queries.
//!
//! Introspection is lazy and per-table: a run only queries the columns of
//! tables the declaration mentions, since most tables are usually already
//! correct.

use crate::{Error, Result};
use std::collections::BTreeSet;
use std::future::Future;
use tokio_postgres::types::ToSql;
use tokio_postgres::{GenericClient, Row};
use tracing::Instrument;
use trueup_db_schema::{Column, Index, SqlType, Value};

/// Read access to the live database's structure.
pub trait Introspector {
    /// Names of the tables that currently exist.
    fn table_names(&self) -> impl Future<Output = Result<BTreeSet<String>>>;

    /// The live columns of `table`, in the order the database reports them.
    /// An absent table has no columns.
    fn columns(&self, table: &str) -> impl Future<Output = Result<Vec<Column>>>;

    /// The live secondary indexes of `table`; primary-key indexes are not
    /// reported. An absent table has no indexes.
    fn indexes(&self, table: &str) -> impl Future<Output = Result<Vec<Index>>>;
}

/// Live introspection over a Postgres connection.
///
/// Works over both a plain client and a transaction, so a run can introspect
/// through the same transaction its DDL executes in.
pub struct PgIntrospector<'a, C: GenericClient> {
    client: &'a C,
}

const TABLES_SQL: &str = "SELECT c.table_name::text \
     FROM information_schema.tables c \
     WHERE c.table_schema = 'public' AND c.table_type = 'BASE TABLE'";

const COLUMNS_SQL: &str = "SELECT c.column_name::text, c.data_type::text, \
        c.character_maximum_length::int, c.numeric_precision::int, c.numeric_scale::int, \
        c.column_default::text, c.is_nullable::text, c.collation_name::text, \
        col_description((quote_ident(c.table_schema) || '.' || quote_ident(c.table_name))::regclass, \
                        c.ordinal_position::int) AS comment \
     FROM information_schema.columns c \
     WHERE c.table_schema = 'public' AND c.table_name = $1 \
     ORDER BY c.ordinal_position";

const INDEXES_SQL: &str = "SELECT i.relname::text AS index_name, ix.indisunique, \
        a.attname::text AS column_name \
     FROM pg_class t \
     JOIN pg_index ix ON t.oid = ix.indrelid \
     JOIN pg_class i ON i.oid = ix.indexrelid \
     JOIN LATERAL unnest(ix.indkey) WITH ORDINALITY AS ord(attnum, ordinality) ON true \
     JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ord.attnum \
     WHERE t.relname = $1 AND NOT ix.indisprimary \
     ORDER BY index_name, ord.ordinality";

impl<'a, C: GenericClient> PgIntrospector<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn catalog_query(
        &self,
        what: String,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        let span = tracing::debug_span!("db.query", sql = %sql);
        self.client
            .query(sql, params)
            .instrument(span)
            .await
            .map_err(|source| Error::Introspection { what, source })
    }
}

impl<C: GenericClient> Introspector for PgIntrospector<'_, C> {
    async fn table_names(&self) -> Result<BTreeSet<String>> {
        let rows = self
            .catalog_query("tables".to_string(), TABLES_SQL, &[])
            .await?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    async fn columns(&self, table: &str) -> Result<Vec<Column>> {
        let rows = self
            .catalog_query(format!("columns of {}", table), COLUMNS_SQL, &[&table])
            .await?;
        Ok(rows.iter().map(column_from_row).collect())
    }

    async fn indexes(&self, table: &str) -> Result<Vec<Index>> {
        let rows = self
            .catalog_query(format!("indexes of {}", table), INDEXES_SQL, &[&table])
            .await?;

        let mut indexes: indexmap::IndexMap<String, Index> = indexmap::IndexMap::new();
        for row in rows {
            let name: String = row.get("index_name");
            let unique: bool = row.get("indisunique");
            let column: String = row.get("column_name");
            indexes
                .entry(name.clone())
                .or_insert_with(|| Index {
                    table: table.to_string(),
                    name: Some(name),
                    columns: Vec::new(),
                    unique,
                })
                .columns
                .push(column);
        }
        Ok(indexes.into_values().collect())
    }
}

fn column_from_row(row: &Row) -> Column {
    let name: String = row.get("column_name");
    let data_type: String = row.get("data_type");
    let char_len: Option<i32> = row.get("character_maximum_length");
    let num_precision: Option<i32> = row.get("numeric_precision");
    let num_scale: Option<i32> = row.get("numeric_scale");
    let default: Option<String> = row.get("column_default");
    let is_nullable: String = row.get("is_nullable");
    let collation: Option<String> = row.get("collation_name");
    let comment: Option<String> = row.get("comment");

    let (ty, limit, precision, scale) = map_data_type(&data_type, char_len, num_precision, num_scale);

    let mut col = Column::new(name, ty);
    col.limit = limit;
    col.precision = precision;
    col.scale = scale;
    col.default = default.map(Value::Text);
    col.nullable = Some(is_nullable == "YES");
    col.collation = collation;
    col.comment = comment;
    col
}

/// Map a native `information_schema` type name back onto the logical type
/// symbols declarations use. The limits mirror what the declaration-side
/// rendering produces, so a freshly created column introspects as equal to
/// its declaration.
fn map_data_type(
    data_type: &str,
    char_len: Option<i32>,
    precision: Option<i32>,
    scale: Option<i32>,
) -> (SqlType, Option<u32>, Option<u32>, Option<u32>) {
    let as_u32 = |v: Option<i32>| v.and_then(|v| u32::try_from(v).ok());
    match data_type {
        "character varying" => (SqlType::String, as_u32(char_len), None, None),
        "text" => (SqlType::Text, None, None, None),
        "smallint" => (SqlType::Integer, Some(2), None, None),
        "integer" => (SqlType::Integer, Some(4), None, None),
        "bigint" => (SqlType::BigInt, None, None, None),
        "real" => (SqlType::Float, Some(4), None, None),
        "double precision" => (SqlType::Float, Some(8), None, None),
        "numeric" => (SqlType::Decimal, None, as_u32(precision), as_u32(scale)),
        "boolean" => (SqlType::Boolean, None, None, None),
        "date" => (SqlType::Date, None, None, None),
        "time without time zone" | "time with time zone" => (SqlType::Time, None, None, None),
        "timestamp without time zone" | "timestamp with time zone" => {
            (SqlType::DateTime, None, None, None)
        }
        "bytea" => (SqlType::Binary, None, None, None),
        other => (SqlType::Other(other.to_string()), None, None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_data_type_round_trips_rendering() {
        // What a declared column renders as must map back to the same
        // logical shape, otherwise every run would re-alter it.
        assert_eq!(
            map_data_type("character varying", Some(255), None, None),
            (SqlType::String, Some(255), None, None)
        );
        assert_eq!(
            map_data_type("smallint", None, Some(16), Some(0)),
            (SqlType::Integer, Some(2), None, None)
        );
        assert_eq!(
            map_data_type("integer", None, Some(32), Some(0)),
            (SqlType::Integer, Some(4), None, None)
        );
        assert_eq!(
            map_data_type("numeric", None, Some(10), Some(2)),
            (SqlType::Decimal, None, Some(10), Some(2))
        );
        assert_eq!(
            map_data_type("uuid", None, None, None),
            (SqlType::Other("uuid".to_string()), None, None, None)
        );
    }
}
