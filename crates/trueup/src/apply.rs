//! DDL execution.

use crate::diff::Change;
use crate::{Error, Result};
use tokio_postgres::GenericClient;
use tracing::Instrument;

/// Applies planned changes against a live connection.
///
/// Changes execute in the order given, fail-fast: the first statement the
/// database rejects stops the run and nothing after it is attempted.
/// Postgres DDL is transactional, so running the executor over a
/// transaction gives a mid-run failure a clean all-or-nothing outcome;
/// engines that auto-commit DDL are not targeted.
pub struct Executor<'a, C: GenericClient> {
    client: &'a C,
}

impl<'a, C: GenericClient> Executor<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Execute every statement of every change. Returns the number of
    /// statements executed.
    pub async fn apply(&self, changes: &[Change]) -> Result<usize> {
        let mut executed = 0;
        for change in changes {
            tracing::debug!(change = %change, "applying");
            for sql in change.statements() {
                let span = tracing::debug_span!("db.execute", sql = %sql);
                self.client
                    .execute(sql.as_str(), &[])
                    .instrument(span)
                    .await
                    .map_err(|source| Error::Ddl {
                        change: change.to_string(),
                        statement: sql.clone(),
                        source,
                    })?;
                executed += 1;
            }
        }
        Ok(executed)
    }
}
