//! Run orchestration - one full reconciliation pass.
//!
//! A pass has three phases, in a fixed order:
//!
//! 1. every declared table is created or column-diffed, in declaration
//!    order;
//! 2. every declared index is created if absent, in declaration order;
//! 3. live tables and indexes that were never declared are dropped.
//!
//! The phase boundary before 3 is load-bearing: the drop pass consumes the
//! [`DeclaredNames`] accumulated by 1 and 2, and running it any earlier
//! would drop tables the declaration simply had not reached yet. The
//! accumulator is an explicit value handed through the traversal, scoped to
//! one run.

use crate::Result;
use crate::apply::Executor;
use crate::diff::{self, Change};
use crate::introspect::{Introspector, PgIntrospector};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;
use tokio_postgres::{Client, Transaction};
use tracing::{info, warn};
use trueup_db_schema::{Column, DeclarationError, Index, Schema, Table};

/// Table and index names processed during a run.
#[derive(Debug, Clone, Default)]
pub struct DeclaredNames {
    pub tables: BTreeSet<String>,
    pub indexes: BTreeSet<String>,
}

/// A declared entity skipped because its declaration is malformed.
#[derive(Debug, Clone)]
pub struct Skipped {
    /// Table name or resolved index name.
    pub entity: String,
    pub error: DeclarationError,
}

/// The ordered change list one reconciliation pass would apply, plus the
/// declared-name sets it accumulated. Produced by [`plan`] without touching
/// the database's structure.
#[derive(Debug, Clone)]
pub struct Plan {
    pub changes: Vec<Change>,
    pub declared: DeclaredNames,
    pub skipped: Vec<Skipped>,
}

impl Plan {
    /// Returns true if the live database already matches the declaration.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Render the whole plan as a SQL script.
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();
        for change in &self.changes {
            sql.push_str(&format!("-- {}\n", change));
            for stmt in change.statements() {
                sql.push_str(&stmt);
                sql.push('\n');
            }
        }
        sql
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changes.is_empty() {
            writeln!(f, "No changes detected.")?;
        } else {
            writeln!(f, "Changes detected:")?;
            writeln!(f)?;
            for change in &self.changes {
                writeln!(f, "  {}", change)?;
            }
        }
        Ok(())
    }
}

/// The outcome of an applied reconciliation pass.
#[derive(Debug)]
pub struct RunReport {
    /// Changes applied, in execution order.
    pub applied: Vec<Change>,
    /// Every declared table and index name, for diagnostics.
    pub declared: DeclaredNames,
    /// Declared entities skipped as malformed.
    pub skipped: Vec<Skipped>,
}

/// Compute the full ordered change list for one pass without executing
/// anything.
pub async fn plan<I: Introspector>(schema: &Schema, introspector: &I) -> Result<Plan> {
    let mut declared = DeclaredNames::default();
    let mut skipped_tables = BTreeSet::new();
    let mut skipped = Vec::new();
    let mut changes = Vec::new();

    let live_tables = introspector.table_names().await?;

    for table in schema.tables.values() {
        if !admit_table(table, &mut skipped_tables, &mut declared, &mut skipped) {
            continue;
        }
        changes.extend(table_changes(introspector, &live_tables, table).await?);
    }
    for index in &schema.indexes {
        if !admit_index(schema, index, &skipped_tables, &mut declared, &mut skipped) {
            continue;
        }
        if let Some(change) = index_change(introspector, index).await? {
            changes.push(change);
        }
    }
    // Only now, with the declared sets complete, is dropping safe.
    changes.extend(drop_pass(introspector, &live_tables, &declared).await?);

    Ok(Plan {
        changes,
        declared,
        skipped,
    })
}

/// Run one full reconciliation pass against a live database.
///
/// The whole pass executes inside a single transaction: Postgres DDL is
/// transactional, so a failed statement rolls back everything the pass
/// already did.
///
/// # Example
///
/// ```ignore
/// let mut schema = Schema::new();
/// schema.add_table(widgets());
///
/// let report = trueup::run(&mut client, &schema).await?;
/// for change in &report.applied {
///     println!("{}", change);
/// }
/// ```
pub async fn run(client: &mut Client, schema: &Schema) -> Result<RunReport> {
    let tx = client.transaction().await?;
    let report = run_tx(&tx, schema).await?;
    tx.commit().await?;
    info!(applied = report.applied.len(), "schema reconciled");
    Ok(report)
}

async fn run_tx(tx: &Transaction<'_>, schema: &Schema) -> Result<RunReport> {
    let introspector = PgIntrospector::new(tx);
    let executor = Executor::new(tx);
    let mut declared = DeclaredNames::default();
    let mut skipped_tables = BTreeSet::new();
    let mut skipped = Vec::new();
    let mut applied = Vec::new();

    let live_tables = introspector.table_names().await?;

    for table in schema.tables.values() {
        if !admit_table(table, &mut skipped_tables, &mut declared, &mut skipped) {
            continue;
        }
        let changes = table_changes(&introspector, &live_tables, table).await?;
        executor.apply(&changes).await?;
        applied.extend(changes);
    }
    for index in &schema.indexes {
        if !admit_index(schema, index, &skipped_tables, &mut declared, &mut skipped) {
            continue;
        }
        if let Some(change) = index_change(&introspector, index).await? {
            executor.apply(std::slice::from_ref(&change)).await?;
            applied.push(change);
        }
    }
    let drops = drop_pass(&introspector, &live_tables, &declared).await?;
    executor.apply(&drops).await?;
    applied.extend(drops);

    Ok(RunReport {
        applied,
        declared,
        skipped,
    })
}

/// Record a declared table and decide whether to process it.
///
/// The name is recorded even when the declaration is rejected: a malformed
/// declaration must not make the drop pass treat the live table as unused.
fn admit_table(
    table: &Table,
    skipped_tables: &mut BTreeSet<String>,
    declared: &mut DeclaredNames,
    skipped: &mut Vec<Skipped>,
) -> bool {
    declared.tables.insert(table.name.clone());
    match table.validate() {
        Ok(()) => true,
        Err(error) => {
            warn!(table = %table.name, %error, "skipping malformed table declaration");
            skipped_tables.insert(table.name.clone());
            skipped.push(Skipped {
                entity: table.name.clone(),
                error,
            });
            false
        }
    }
}

/// Record a declared index name and decide whether to process the index.
///
/// An index on a table that was itself skipped is skipped too: its table
/// may not exist to index.
fn admit_index(
    schema: &Schema,
    index: &Index,
    skipped_tables: &BTreeSet<String>,
    declared: &mut DeclaredNames,
    skipped: &mut Vec<Skipped>,
) -> bool {
    let name = index.resolved_name();
    let result = if !declared.indexes.insert(name.clone()) {
        Err(DeclarationError::DuplicateIndex { name: name.clone() })
    } else if skipped_tables.contains(&index.table) {
        Err(DeclarationError::IndexOnSkippedTable {
            table: index.table.clone(),
            name: name.clone(),
        })
    } else {
        schema.validate_index(index)
    };
    match result {
        Ok(()) => true,
        Err(error) => {
            warn!(index = %name, %error, "skipping malformed index declaration");
            skipped.push(Skipped {
                entity: name,
                error,
            });
            false
        }
    }
}

async fn table_changes<I: Introspector>(
    introspector: &I,
    live_tables: &BTreeSet<String>,
    table: &Table,
) -> Result<Vec<Change>> {
    if !live_tables.contains(&table.name) {
        // A brand-new table needs no column-level diff.
        return Ok(vec![Change::CreateTable(table.clone())]);
    }
    let live: IndexMap<String, Column> = introspector
        .columns(&table.name)
        .await?
        .into_iter()
        .map(|c| (c.name.clone(), c))
        .collect();
    Ok(diff::diff_columns(table, &live))
}

async fn index_change<I: Introspector>(
    introspector: &I,
    index: &Index,
) -> Result<Option<Change>> {
    let name = index.resolved_name();
    let live = introspector.indexes(&index.table).await?;
    // Matching is by name only; a column-set change under a stable name is
    // not detected.
    if live.iter().any(|i| i.resolved_name() == name) {
        Ok(None)
    } else {
        Ok(Some(Change::AddIndex(index.clone())))
    }
}

async fn drop_pass<I: Introspector>(
    introspector: &I,
    live_tables: &BTreeSet<String>,
    declared: &DeclaredNames,
) -> Result<Vec<Change>> {
    let mut changes = diff::unused_tables(live_tables, &declared.tables);
    for table in &declared.tables {
        let live = introspector.indexes(table).await?;
        changes.extend(diff::unused_indexes(table, &live, &declared.indexes));
    }
    Ok(changes)
}
