//! Utility macros shared across the crate.

/// Returns early with `$error` if `$predicate` does not hold.
///
/// This is the error-returning counterpart of `assert!`, used for validation
/// where a failed check is a recoverable condition.
///
/// ```ignore
/// ensure!(length <= limit, FieldError::body_too_large(length, limit));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
