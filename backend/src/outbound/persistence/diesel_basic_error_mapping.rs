//! Translation of pool and Diesel failures into collection store errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::CollectionStoreError;

use super::pool::PoolError;

pub(crate) fn map_pool_error(error: PoolError) -> CollectionStoreError {
    debug!(%error, "document store pool checkout failed");
    CollectionStoreError::connection(error.message())
}

/// Driver detail is logged at debug level and kept out of the message.
pub(crate) fn map_diesel_error(error: DieselError) -> CollectionStoreError {
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
        DieselError::NotFound => CollectionStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => CollectionStoreError::query("database query error"),
        DieselError::DeserializationError(_) | DieselError::SerializationError(_) => {
            CollectionStoreError::serialization("document column could not be converted")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            CollectionStoreError::query("duplicate document id")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CollectionStoreError::connection("database connection error")
        }
        _ => CollectionStoreError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_failures_are_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(err, CollectionStoreError::Connection { ref message } if message == "timed out"));
    }

    #[rstest]
    #[case(DieselError::NotFound, "record not found")]
    #[case(DieselError::RollbackTransaction, "database error")]
    fn query_failures_hide_driver_detail(#[case] error: DieselError, #[case] expected: &str) {
        let err = map_diesel_error(error);
        assert!(matches!(err, CollectionStoreError::Query { ref message } if message == expected));
    }
}
