//! Shared Diesel error mapping.
//!
//! Every repository classifies failures the same way: pool checkout and
//! closed connections are connection errors (503 at the edge), everything
//! else is a query error (500). Unique violations are surfaced separately
//! because each table gives them a different meaning.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through the repository's `connection` constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    debug!(%error, "connection pool checkout failed");
    connection(error.message().to_owned())
}

/// Map a Diesel failure through the repository's constructors.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Whether `error` is a unique-constraint violation.
pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Probe {
        Query(&'static str),
        Connection(String),
    }

    fn map(error: DieselError) -> Probe {
        map_basic_diesel_error(error, Probe::Query, |msg| Probe::Connection(msg.to_owned()))
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        assert_eq!(map(DieselError::NotFound), Probe::Query("record not found"));
    }

    #[rstest]
    fn rollback_is_a_generic_query_error() {
        assert_eq!(
            map(DieselError::RollbackTransaction),
            Probe::Query("database error")
        );
    }

    #[rstest]
    fn pool_failures_use_the_connection_constructor() {
        let error = PoolError::Checkout {
            message: "timed out".to_owned(),
        };
        let mapped: Probe = map_basic_pool_error(error, Probe::Connection);
        assert_eq!(mapped, Probe::Connection("timed out".to_owned()));
    }

    #[rstest]
    fn only_database_errors_are_unique_violations() {
        assert!(!is_unique_violation(&DieselError::NotFound));
    }
}
