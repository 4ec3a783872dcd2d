//! Classification of database errors.

/// Name of the unique constraint guarding `short_links.code`.
pub const CODE_UNIQUE_CONSTRAINT: &str = "short_links_code_key";

/// Returns true if the error is a unique violation on the short code column.
///
/// This is the authoritative guard against two concurrent allocations of the
/// same code; the read-side pre-check only shortens the feedback loop.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(CODE_UNIQUE_CONSTRAINT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!is_unique_violation_on_code(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation_on_code(&sqlx::Error::PoolTimedOut));
    }
}
