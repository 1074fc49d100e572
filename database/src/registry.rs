/// We use `u8::MAX` as a reserved separator byte. Through the
/// [`DatabaseStorePrefixes`] enum we make sure it is never used as a prefix
pub const SEPARATOR: u8 = u8::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DatabaseStorePrefixes {
    // ---- DAG ----
    /// Block index records keyed by big-endian block id. Holds legacy records
    /// until the index upgrade rewrites them in place
    BlockIndex = 1,

    // ---- Metadata ----
    DagMetadata = 124,

    // ---- Separator ----
    /// Reserved as a separator
    Separator = SEPARATOR,
}

impl From<DatabaseStorePrefixes> for Vec<u8> {
    fn from(value: DatabaseStorePrefixes) -> Self {
        [value as u8].to_vec()
    }
}

impl From<DatabaseStorePrefixes> for u8 {
    fn from(value: DatabaseStorePrefixes) -> Self {
        value as u8
    }
}

impl AsRef<[u8]> for DatabaseStorePrefixes {
    fn as_ref(&self) -> &[u8] {
        match self {
            Self::BlockIndex => &[Self::BlockIndex as u8],
            Self::DagMetadata => &[Self::DagMetadata as u8],
            Self::Separator => &[SEPARATOR],
        }
    }
}
