//! Declarative schema reconciliation for Postgres.
//!
//! A codebase declares the tables, columns, and indexes it wants; `trueup`
//! introspects what the live database actually has, computes the minimal
//! set of DDL changes between the two, and applies them, with no hand-written,
//! hand-ordered migration steps.
//!
//! # How a pass works
//!
//! For every declared table, in declaration order: create it if it does not
//! exist, otherwise diff its columns attribute by attribute (coercing stored
//! default representations to the declared type first) and alter what
//! differs. Then create any declared index whose name is missing live.
//! Finally drop the tables and indexes that exist live but were never
//! declared; the migration bookkeeping tables are always left alone.
//!
//! Running the same declaration twice in a row applies nothing the second
//! time.
//!
//! # Example
//!
//! ```ignore
//! use trueup::{Column, Index, Schema, SqlType, Table, Value};
//!
//! let mut widgets = Table::new("widgets");
//! let mut name = Column::new("name", SqlType::String);
//! name.nullable = Some(false);
//! let mut qty = Column::new("qty", SqlType::Integer);
//! qty.default = Some(Value::Int(0));
//! widgets.columns = vec![name, qty];
//!
//! let mut schema = Schema::new();
//! schema.add_table(widgets);
//! schema.add_index(Index::new("widgets", vec!["name".to_string()]));
//!
//! let report = trueup::run(&mut client, &schema).await?;
//! ```
//!
//! Use [`plan`] with any [`Introspector`] to compute the change list
//! without executing it.

mod apply;
mod coerce;
mod diff;
mod error;
mod introspect;
mod run;

pub use apply::Executor;
pub use coerce::{defaults_equal, normalize};
pub use diff::{Change, ColumnAttrs, PROTECTED_TABLES, desired_columns, diff_columns};
pub use error::Error;
pub use introspect::{Introspector, PgIntrospector};
pub use run::{DeclaredNames, Plan, RunReport, Skipped, plan, run};

// Re-export the schema model so declarations only need this crate.
pub use trueup_db_schema::{Column, DeclarationError, Index, Schema, SqlType, Table, Value};

/// Result type for trueup operations.
pub type Result<T> = std::result::Result<T, Error>;
