use crate::prelude::DbKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("key {0} not found in store")]
    KeyNotFound(DbKey),

    #[error("data inconsistency: {0}")]
    DataInconsistency(String),

    #[error("rocksdb error {0}")]
    DbError(#[from] rocksdb::Error),

    #[error("bincode error {0}")]
    DeserializationError(#[from] Box<bincode::ErrorKind>),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub trait StoreResultExtensions<T> {
    /// Converts a "key not found" error into `Ok(None)`, keeping any other error
    fn optional(self) -> StoreResult<Option<T>>;
}

impl<T> StoreResultExtensions<T> for StoreResult<T> {
    fn optional(self) -> StoreResult<Option<T>> {
        match self {
            Ok(data) => Ok(Some(data)),
            Err(StoreError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional() {
        let found: StoreResult<u32> = Ok(3);
        assert_eq!(found.optional().unwrap(), Some(3));

        let missing: StoreResult<u32> = Err(StoreError::KeyNotFound(DbKey::prefix_only(b"x")));
        assert_eq!(missing.optional().unwrap(), None);

        let broken: StoreResult<u32> = Err(StoreError::DataInconsistency("bad".to_string()));
        assert!(matches!(broken.optional(), Err(StoreError::DataInconsistency(_))));
    }
}
