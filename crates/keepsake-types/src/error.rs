use thiserror::Error;

/// Errors from memory persistence backends (used by the port in keepsake-core).
///
/// An absent backing resource is not an error: backends report it as an
/// empty collection.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("i/o error: {0}")]
    Io(String),

    #[error("corrupt memory collection: {0}")]
    Corrupt(String),

    #[error("query error: {0}")]
    Query(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::Corrupt("expected array".to_string());
        assert_eq!(err.to_string(), "corrupt memory collection: expected array");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PersistenceError = io.into();
        assert!(matches!(err, PersistenceError::Io(msg) if msg.contains("denied")));
    }
}
