//! Schema diffing - compare a declared schema against live database
//! structure.
//!
//! The reconciler produces a list of [`Change`] values rather than executing
//! anything directly: the change list is inspectable, printable, and
//! testable without a database, and the executor consumes it by exhaustive
//! matching.
//!
//! ## What counts as a change
//!
//! - A column present in the declaration but not live is added; the reverse
//!   is removed.
//! - A column on both sides is altered when its type symbol differs, or when
//!   any attribute the declaration explicitly specifies (limit, precision,
//!   scale, default, nullable, collation, comment) differs from the live
//!   value. Stored defaults are normalized to the declared type before the
//!   comparison (see [`crate::coerce`]).
//! - The primary-key column is exempt from in-place alteration and removal.
//! - Indexes are matched **by name only**: an index whose column set changed
//!   under a stable name is not detected. Rebuilding a large index is an
//!   operator decision, not something a routine reconciliation pass should
//!   trigger silently.

use crate::coerce;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;
use trueup_db_schema::{Column, Index, SqlType, Table, Value};
use trueup_sql::{Lit, quote_ident};

/// Tables the drop-unused pass never touches, regardless of whether they
/// appear in the declaration. Both hold migration bookkeeping.
pub const PROTECTED_TABLES: [&str; 2] = ["schema_migrations", "schema_info"];

/// A single structural change needed to bring the live database in line
/// with the declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Create a table that does not exist live, including its primary key.
    CreateTable(Table),
    /// Add a column with its full declared attribute set.
    AddColumn { table: String, column: Column },
    /// Alter a column in place. `attrs` carries only what differs, plus the
    /// NUMERIC precision/scale pair whenever the declaration has either.
    ChangeColumn {
        table: String,
        name: String,
        from: SqlType,
        to: SqlType,
        attrs: ColumnAttrs,
    },
    /// Drop a column no longer declared.
    RemoveColumn { table: String, name: String },
    /// Drop a table no longer declared.
    DropTable(String),
    /// Create a declared index missing live.
    AddIndex(Index),
    /// Drop a live index no longer declared.
    DropIndex { table: String, name: String },
}

/// The attribute payload of a [`Change::ChangeColumn`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnAttrs {
    pub limit: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub default: Option<Value>,
    pub nullable: Option<bool>,
    pub collation: Option<String>,
    pub comment: Option<String>,
}

impl ColumnAttrs {
    fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.limit.is_some() {
            names.push("limit");
        }
        if self.precision.is_some() {
            names.push("precision");
        }
        if self.scale.is_some() {
            names.push("scale");
        }
        if self.default.is_some() {
            names.push("default");
        }
        if self.nullable.is_some() {
            names.push("nullable");
        }
        if self.collation.is_some() {
            names.push("collation");
        }
        if self.comment.is_some() {
            names.push("comment");
        }
        names
    }
}

impl Change {
    /// Render this change as the SQL statements that apply it, in order.
    pub fn statements(&self) -> Vec<String> {
        match self {
            Change::CreateTable(table) => {
                let desired = desired_columns(table);
                let parts: Vec<String> = desired
                    .values()
                    .map(|col| format!("    {}", column_def(col)))
                    .collect();
                let mut sql = format!("CREATE TABLE {} (\n", quote_ident(&table.name));
                sql.push_str(&parts.join(",\n"));
                match &table.options {
                    Some(options) => sql.push_str(&format!("\n) {};", options)),
                    None => sql.push_str("\n);"),
                }
                let mut stmts = vec![sql];
                for col in desired.values() {
                    if let Some(comment) = &col.comment {
                        stmts.push(comment_sql(&table.name, &col.name, comment));
                    }
                }
                stmts
            }
            Change::AddColumn { table, column } => {
                let mut stmts = vec![format!(
                    "ALTER TABLE {} ADD COLUMN {};",
                    quote_ident(table),
                    column_def(column)
                )];
                if let Some(comment) = &column.comment {
                    stmts.push(comment_sql(table, &column.name, comment));
                }
                stmts
            }
            Change::ChangeColumn {
                table,
                name,
                from,
                to,
                attrs,
            } => {
                let mut stmts = Vec::new();
                let type_changed = from != to
                    || attrs.limit.is_some()
                    || attrs.precision.is_some()
                    || attrs.scale.is_some()
                    || attrs.collation.is_some();
                if type_changed {
                    let ty = to.to_sql(attrs.limit, attrs.precision, attrs.scale);
                    let collate = attrs
                        .collation
                        .as_ref()
                        .map(|c| format!(" COLLATE {}", quote_ident(c)))
                        .unwrap_or_default();
                    stmts.push(format!(
                        "ALTER TABLE {} ALTER COLUMN {} TYPE {}{} USING {}::{};",
                        quote_ident(table),
                        quote_ident(name),
                        ty,
                        collate,
                        quote_ident(name),
                        ty
                    ));
                }
                if let Some(default) = &attrs.default {
                    stmts.push(format!(
                        "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {};",
                        quote_ident(table),
                        quote_ident(name),
                        default.to_sql()
                    ));
                }
                if let Some(nullable) = attrs.nullable {
                    let action = if nullable {
                        "DROP NOT NULL"
                    } else {
                        "SET NOT NULL"
                    };
                    stmts.push(format!(
                        "ALTER TABLE {} ALTER COLUMN {} {};",
                        quote_ident(table),
                        quote_ident(name),
                        action
                    ));
                }
                if let Some(comment) = &attrs.comment {
                    stmts.push(comment_sql(table, name, comment));
                }
                stmts
            }
            Change::RemoveColumn { table, name } => {
                vec![format!(
                    "ALTER TABLE {} DROP COLUMN {};",
                    quote_ident(table),
                    quote_ident(name)
                )]
            }
            Change::DropTable(name) => {
                vec![format!("DROP TABLE {};", quote_ident(name))]
            }
            Change::AddIndex(index) => {
                let unique = if index.unique { "UNIQUE " } else { "" };
                let cols: Vec<String> = index.columns.iter().map(|c| quote_ident(c)).collect();
                vec![format!(
                    "CREATE {}INDEX {} ON {} ({});",
                    unique,
                    quote_ident(&index.resolved_name()),
                    quote_ident(&index.table),
                    cols.join(", ")
                )]
            }
            Change::DropIndex { name, .. } => {
                vec![format!("DROP INDEX {};", quote_ident(name))]
            }
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::CreateTable(table) => write!(f, "+ table {}", table.name),
            Change::DropTable(name) => write!(f, "- table {}", name),
            Change::AddColumn { table, column } => {
                let nullable = if column.nullable == Some(true) {
                    " (nullable)"
                } else {
                    ""
                };
                write!(f, "+ {}.{}: {}{}", table, column.name, column.ty, nullable)
            }
            Change::RemoveColumn { table, name } => write!(f, "- {}.{}", table, name),
            Change::ChangeColumn {
                table,
                name,
                from,
                to,
                attrs,
            } => {
                if from != to {
                    write!(f, "~ {}.{}: {} -> {}", table, name, from, to)
                } else {
                    write!(f, "~ {}.{} ({})", table, name, attrs.names().join(", "))
                }
            }
            Change::AddIndex(index) => {
                let unique = if index.unique { "unique " } else { "" };
                write!(
                    f,
                    "+ {}index {} on {} ({})",
                    unique,
                    index.resolved_name(),
                    index.table,
                    index.columns.join(", ")
                )
            }
            Change::DropIndex { table, name } => write!(f, "- index {} on {}", name, table),
        }
    }
}

fn comment_sql(table: &str, column: &str, comment: &str) -> String {
    format!(
        "COMMENT ON COLUMN {}.{} IS {};",
        quote_ident(table),
        quote_ident(column),
        Lit(comment)
    )
}

fn column_type_sql(col: &Column) -> String {
    // The conventional auto-incrementing primary key.
    if col.primary_key && col.default.is_none() {
        match col.ty {
            SqlType::BigInt => return "BIGSERIAL".to_string(),
            SqlType::Integer => return "SERIAL".to_string(),
            _ => {}
        }
    }
    col.ty.to_sql(col.limit, col.precision, col.scale)
}

fn column_def(col: &Column) -> String {
    let mut def = format!("{} {}", quote_ident(&col.name), column_type_sql(col));
    if let Some(collation) = &col.collation {
        def.push_str(&format!(" COLLATE {}", quote_ident(collation)));
    }
    if col.primary_key {
        def.push_str(" PRIMARY KEY");
    }
    if col.nullable == Some(false) && !col.primary_key {
        def.push_str(" NOT NULL");
    }
    if let Some(default) = &col.default {
        def.push_str(&format!(" DEFAULT {}", default.to_sql()));
    }
    def
}

/// The full desired column map for a table: declared columns by name, with
/// the implicit primary-key column in front unless it is suppressed or
/// declared explicitly.
pub fn desired_columns(table: &Table) -> IndexMap<String, Column> {
    let mut desired = IndexMap::new();
    if let Some(pk) = &table.primary_key {
        if !table.columns.iter().any(|c| &c.name == pk) {
            let mut col = Column::new(pk.clone(), SqlType::BigInt);
            col.primary_key = true;
            desired.insert(pk.clone(), col);
        }
    }
    for col in &table.columns {
        let mut col = col.clone();
        if table.primary_key.as_deref() == Some(col.name.as_str()) {
            col.primary_key = true;
        }
        desired.insert(col.name.clone(), col);
    }
    desired
}

/// Diff one table's declared columns against its live columns.
pub fn diff_columns(table: &Table, live: &IndexMap<String, Column>) -> Vec<Change> {
    let desired = desired_columns(table);
    let mut changes = Vec::new();

    // Columns new to the declaration
    for (name, col) in &desired {
        if !live.contains_key(name) {
            changes.push(Change::AddColumn {
                table: table.name.clone(),
                column: col.clone(),
            });
        }
    }

    // Live columns no longer declared
    for name in live.keys() {
        if !desired.contains_key(name) {
            changes.push(Change::RemoveColumn {
                table: table.name.clone(),
                name: name.clone(),
            });
        }
    }

    // Columns on both sides; the primary key is never altered in place
    for (name, col) in &desired {
        if col.primary_key {
            continue;
        }
        let Some(live_col) = live.get(name) else {
            continue;
        };
        if let Some(change) = column_change(&table.name, col, live_col) {
            changes.push(change);
        }
    }

    changes
}

fn column_change(table: &str, declared: &Column, live: &Column) -> Option<Change> {
    let mut changed = declared.ty != live.ty;
    let mut attrs = ColumnAttrs::default();

    // NUMERIC modifiers must be restated jointly in DDL, so both ride along
    // whenever the declaration carries either.
    if declared.precision.is_some() || declared.scale.is_some() {
        attrs.precision = declared.precision;
        attrs.scale = declared.scale;
    }

    if let Some(limit) = declared.limit {
        if live.limit != Some(limit) {
            attrs.limit = Some(limit);
            changed = true;
        }
    }
    if let Some(precision) = declared.precision {
        if live.precision != Some(precision) {
            changed = true;
        }
    }
    if let Some(scale) = declared.scale {
        if live.scale != Some(scale) {
            changed = true;
        }
    }
    if let Some(default) = &declared.default {
        let equal = live
            .default
            .as_ref()
            .is_some_and(|l| coerce::defaults_equal(&declared.ty, default, l));
        if !equal {
            attrs.default = Some(default.clone());
            changed = true;
        }
    }
    if let Some(nullable) = declared.nullable {
        if live.nullable != Some(nullable) {
            attrs.nullable = Some(nullable);
            changed = true;
        }
    }
    if let Some(collation) = &declared.collation {
        if live.collation.as_ref() != Some(collation) {
            attrs.collation = Some(collation.clone());
            changed = true;
        }
    }
    if let Some(comment) = &declared.comment {
        if live.comment.as_ref() != Some(comment) {
            attrs.comment = Some(comment.clone());
            changed = true;
        }
    }

    changed.then(|| Change::ChangeColumn {
        table: table.to_string(),
        name: declared.name.clone(),
        from: live.ty.clone(),
        to: declared.ty.clone(),
        attrs,
    })
}

/// Drops for live tables absent from the declaration, minus the protected
/// bookkeeping tables.
pub fn unused_tables(live: &BTreeSet<String>, declared: &BTreeSet<String>) -> Vec<Change> {
    live.iter()
        .filter(|t| !declared.contains(*t))
        .filter(|t| !PROTECTED_TABLES.contains(&t.as_str()))
        .map(|t| Change::DropTable(t.clone()))
        .collect()
}

/// Drops for one table's live indexes whose names are not declared.
pub fn unused_indexes(table: &str, live: &[Index], declared: &BTreeSet<String>) -> Vec<Change> {
    live.iter()
        .filter(|i| !declared.contains(&i.resolved_name()))
        .map(|i| Change::DropIndex {
            table: table.to_string(),
            name: i.resolved_name(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_column(name: &str, ty: SqlType) -> Column {
        Column::new(name, ty)
    }

    fn make_table(name: &str, columns: Vec<Column>) -> Table {
        let mut table = Table::new(name);
        table.columns = columns;
        table
    }

    fn live_map(columns: Vec<Column>) -> IndexMap<String, Column> {
        columns.into_iter().map(|c| (c.name.clone(), c)).collect()
    }

    fn live_pk() -> Column {
        let mut id = make_column("id", SqlType::BigInt);
        id.nullable = Some(false);
        id.default = Some(Value::Text(
            "nextval('widgets_id_seq'::regclass)".to_string(),
        ));
        id
    }

    #[test]
    fn test_diff_add_column() {
        let mut qty = make_column("qty", SqlType::Integer);
        qty.default = Some(Value::Int(0));
        let table = make_table(
            "widgets",
            vec![make_column("name", SqlType::String), qty],
        );
        let live = live_map(vec![live_pk(), {
            let mut c = make_column("name", SqlType::String);
            c.limit = Some(255);
            c.nullable = Some(true);
            c
        }]);

        let changes = diff_columns(&table, &live);
        assert_eq!(changes.len(), 1);
        assert!(matches!(
            &changes[0],
            Change::AddColumn { table, column } if table == "widgets" && column.name == "qty"
        ));
    }

    #[test]
    fn test_diff_remove_column() {
        let table = make_table("widgets", vec![make_column("name", SqlType::String)]);
        let live = live_map(vec![
            live_pk(),
            {
                let mut c = make_column("name", SqlType::String);
                c.nullable = Some(true);
                c
            },
            {
                let mut c = make_column("legacy_flag", SqlType::Boolean);
                c.nullable = Some(true);
                c
            },
        ]);

        let changes = diff_columns(&table, &live);
        assert_eq!(changes.len(), 1);
        assert!(matches!(
            &changes[0],
            Change::RemoveColumn { name, .. } if name == "legacy_flag"
        ));
    }

    #[test]
    fn test_diff_type_change() {
        let table = make_table("widgets", vec![make_column("qty", SqlType::Integer)]);
        let live = live_map(vec![live_pk(), {
            let mut c = make_column("qty", SqlType::Text);
            c.nullable = Some(true);
            c
        }]);

        let changes = diff_columns(&table, &live);
        assert_eq!(changes.len(), 1);
        assert!(matches!(
            &changes[0],
            Change::ChangeColumn { name, from: SqlType::Text, to: SqlType::Integer, .. } if name == "qty"
        ));
    }

    #[test]
    fn test_diff_primary_key_is_immune() {
        // The live primary key disagrees on type and default; no change may
        // be produced for it.
        let table = make_table("widgets", vec![]);
        let live = live_map(vec![{
            let mut id = make_column("id", SqlType::Integer);
            id.nullable = Some(false);
            id
        }]);

        assert!(diff_columns(&table, &live).is_empty());
    }

    #[test]
    fn test_diff_unspecified_attrs_are_not_compared() {
        // Declared without limit or nullability; live reports both.
        let table = make_table("widgets", vec![make_column("name", SqlType::String)]);
        let live = live_map(vec![live_pk(), {
            let mut c = make_column("name", SqlType::String);
            c.limit = Some(255);
            c.nullable = Some(true);
            c
        }]);

        assert!(diff_columns(&table, &live).is_empty());
    }

    #[test]
    fn test_diff_default_coercion_equivalence() {
        let mut active = make_column("active", SqlType::Boolean);
        active.default = Some(Value::Bool(true));
        let table = make_table("widgets", vec![active.clone()]);

        let live = live_map(vec![live_pk(), {
            let mut c = make_column("active", SqlType::Boolean);
            c.nullable = Some(true);
            c.default = Some(Value::Text("1".to_string()));
            c
        }]);

        // Stored "1" is the declared `true` after coercion.
        assert!(diff_columns(&table, &live).is_empty());

        // Declaring `false` instead is a real change.
        active.default = Some(Value::Bool(false));
        let table = make_table("widgets", vec![active]);
        let changes = diff_columns(&table, &live);
        assert_eq!(changes.len(), 1);
        assert!(matches!(
            &changes[0],
            Change::ChangeColumn { attrs, .. } if attrs.default == Some(Value::Bool(false))
        ));
    }

    #[test]
    fn test_diff_precision_scale_travel_together() {
        let mut price = make_column("price", SqlType::Decimal);
        price.precision = Some(10);
        price.scale = Some(2);
        let table = make_table("widgets", vec![price]);

        let live = live_map(vec![live_pk(), {
            let mut c = make_column("price", SqlType::Decimal);
            c.precision = Some(10);
            c.scale = Some(0);
            c.nullable = Some(true);
            c
        }]);

        let changes = diff_columns(&table, &live);
        assert_eq!(changes.len(), 1);
        let Change::ChangeColumn { attrs, .. } = &changes[0] else {
            panic!("expected ChangeColumn, got {:?}", changes[0]);
        };
        // Only scale differs, but the pair is carried whole.
        assert_eq!(attrs.precision, Some(10));
        assert_eq!(attrs.scale, Some(2));
    }

    #[test]
    fn test_diff_nullable_change() {
        let mut name = make_column("name", SqlType::String);
        name.nullable = Some(false);
        let table = make_table("widgets", vec![name]);

        let live = live_map(vec![live_pk(), {
            let mut c = make_column("name", SqlType::String);
            c.limit = Some(255);
            c.nullable = Some(true);
            c
        }]);

        let changes = diff_columns(&table, &live);
        assert_eq!(changes.len(), 1);
        assert!(matches!(
            &changes[0],
            Change::ChangeColumn { attrs, .. } if attrs.nullable == Some(false)
        ));
    }

    #[test]
    fn test_unused_tables_respects_protection() {
        let live: BTreeSet<String> = ["widgets", "old_reports", "schema_migrations", "schema_info"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let declared: BTreeSet<String> = ["widgets"].iter().map(|s| s.to_string()).collect();

        let changes = unused_tables(&live, &declared);
        assert_eq!(changes.len(), 1);
        assert!(matches!(
            &changes[0],
            Change::DropTable(name) if name == "old_reports"
        ));
    }

    #[test]
    fn test_unused_indexes() {
        let live = vec![
            Index {
                table: "widgets".to_string(),
                name: Some("idx_widgets_name".to_string()),
                columns: vec!["name".to_string()],
                unique: false,
            },
            Index {
                table: "widgets".to_string(),
                name: Some("idx_widgets_legacy".to_string()),
                columns: vec!["legacy_flag".to_string()],
                unique: false,
            },
        ];
        let declared: BTreeSet<String> = ["idx_widgets_name"].iter().map(|s| s.to_string()).collect();

        let changes = unused_indexes("widgets", &live, &declared);
        assert_eq!(changes.len(), 1);
        assert!(matches!(
            &changes[0],
            Change::DropIndex { name, .. } if name == "idx_widgets_legacy"
        ));
    }

    // ===== SQL rendering snapshots =====

    #[test]
    fn snapshot_create_table() {
        let mut name = make_column("name", SqlType::String);
        name.nullable = Some(false);
        let mut qty = make_column("qty", SqlType::Integer);
        qty.default = Some(Value::Int(0));
        let table = make_table("widgets", vec![name, qty]);

        let sql = Change::CreateTable(table).statements().join("\n");
        insta::assert_snapshot!(sql, @r#"
        CREATE TABLE "widgets" (
            "id" BIGSERIAL PRIMARY KEY,
            "name" VARCHAR(255) NOT NULL,
            "qty" INTEGER DEFAULT 0
        );
        "#);
    }

    #[test]
    fn snapshot_create_table_custom_key_and_options() {
        let mut code = make_column("code", SqlType::String);
        code.limit = Some(12);
        let mut table = make_table("regions", vec![code, make_column("label", SqlType::Text)]);
        table.primary_key = Some("code".to_string());
        table.options = Some("WITH (fillfactor = 70)".to_string());

        let sql = Change::CreateTable(table).statements().join("\n");
        insta::assert_snapshot!(sql, @r#"
        CREATE TABLE "regions" (
            "code" VARCHAR(12) PRIMARY KEY,
            "label" TEXT
        ) WITH (fillfactor = 70);
        "#);
    }

    #[test]
    fn snapshot_add_column_with_comment() {
        let mut qty = make_column("qty", SqlType::Integer);
        qty.default = Some(Value::Int(0));
        qty.comment = Some("Stock on hand".to_string());

        let sql = Change::AddColumn {
            table: "widgets".to_string(),
            column: qty,
        }
        .statements()
        .join("\n");
        insta::assert_snapshot!(sql, @r#"
        ALTER TABLE "widgets" ADD COLUMN "qty" INTEGER DEFAULT 0;
        COMMENT ON COLUMN "widgets"."qty" IS 'Stock on hand';
        "#);
    }

    #[test]
    fn snapshot_change_column_type_and_nullability() {
        let sql = Change::ChangeColumn {
            table: "widgets".to_string(),
            name: "name".to_string(),
            from: SqlType::Text,
            to: SqlType::String,
            attrs: ColumnAttrs {
                limit: Some(40),
                nullable: Some(false),
                ..Default::default()
            },
        }
        .statements()
        .join("\n");
        insta::assert_snapshot!(sql, @r#"
        ALTER TABLE "widgets" ALTER COLUMN "name" TYPE VARCHAR(40) USING "name"::VARCHAR(40);
        ALTER TABLE "widgets" ALTER COLUMN "name" SET NOT NULL;
        "#);
    }

    #[test]
    fn snapshot_change_column_default_only() {
        // Same type on both sides: no TYPE statement is emitted.
        let sql = Change::ChangeColumn {
            table: "widgets".to_string(),
            name: "active".to_string(),
            from: SqlType::Boolean,
            to: SqlType::Boolean,
            attrs: ColumnAttrs {
                default: Some(Value::Bool(false)),
                ..Default::default()
            },
        }
        .statements()
        .join("\n");
        insta::assert_snapshot!(sql, @r#"ALTER TABLE "widgets" ALTER COLUMN "active" SET DEFAULT FALSE;"#);
    }

    #[test]
    fn snapshot_add_index() {
        let index = Index {
            table: "widgets".to_string(),
            name: None,
            columns: vec!["name".to_string(), "qty".to_string()],
            unique: true,
        };
        let sql = Change::AddIndex(index).statements().join("\n");
        insta::assert_snapshot!(sql, @r#"CREATE UNIQUE INDEX "uq_widgets_name_qty" ON "widgets" ("name", "qty");"#);
    }

    #[test]
    fn test_drop_statements() {
        assert_eq!(
            Change::DropTable("old_reports".to_string()).statements(),
            vec!["DROP TABLE \"old_reports\";"]
        );
        assert_eq!(
            Change::RemoveColumn {
                table: "widgets".to_string(),
                name: "legacy_flag".to_string(),
            }
            .statements(),
            vec!["ALTER TABLE \"widgets\" DROP COLUMN \"legacy_flag\";"]
        );
        assert_eq!(
            Change::DropIndex {
                table: "widgets".to_string(),
                name: "idx_widgets_legacy".to_string(),
            }
            .statements(),
            vec!["DROP INDEX \"idx_widgets_legacy\";"]
        );
    }

    #[test]
    fn test_change_display() {
        let change = Change::ChangeColumn {
            table: "widgets".to_string(),
            name: "qty".to_string(),
            from: SqlType::Text,
            to: SqlType::Integer,
            attrs: ColumnAttrs::default(),
        };
        assert_eq!(change.to_string(), "~ widgets.qty: text -> integer");

        let change = Change::DropTable("old_reports".to_string());
        assert_eq!(change.to_string(), "- table old_reports");
    }
}
