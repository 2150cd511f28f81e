use thiserror::Error;
use trueup_db_schema::DeclarationError;

#[derive(Debug, Error)]
pub enum Error {
    /// A declared entity is structurally malformed. Detected before any DDL
    /// is issued for that entity; the run skips it and continues.
    #[error("declaration error: {0}")]
    Declaration(#[from] DeclarationError),

    /// The live database could not be queried for structure. Fatal to the
    /// run.
    #[error("introspecting {what} failed: {source}")]
    Introspection {
        what: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// A DDL statement was rejected by the database. Fatal to the run; the
    /// surrounding transaction rolls back whatever was already applied.
    #[error("{change}: `{statement}` failed: {source}")]
    Ddl {
        change: String,
        statement: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Transaction control failed.
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}
