use std::{
    fmt::{Debug, Display},
    str,
};

pub const SEP: u8 = b'/';
pub const SEP_SIZE: usize = 1;

/// A full DB key: `prefix · SEP · key`
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DbKey {
    path: Vec<u8>,
    prefix_len: usize,
}

impl DbKey {
    pub fn new<TKey>(prefix: &[u8], key: TKey) -> Self
    where
        TKey: AsRef<[u8]>,
    {
        Self {
            path: prefix.iter().chain(std::iter::once(&SEP)).chain(key.as_ref().iter()).copied().collect(),
            prefix_len: prefix.len() + SEP_SIZE, // Include `SEP` as part of the prefix
        }
    }

    pub fn prefix_only(prefix: &[u8]) -> Self {
        Self::new(prefix, [])
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }
}

impl AsRef<[u8]> for DbKey {
    fn as_ref(&self) -> &[u8] {
        &self.path
    }
}

impl Display for DbKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (prefix, key) = self.path.split_at(self.prefix_len);
        // Registry prefixes are single bytes and rarely printable, so go with hex unless the prefix is readable text
        match str::from_utf8(prefix) {
            Ok(s) if s.chars().all(|c| c.is_ascii_graphic()) => f.write_str(s)?,
            _ => {
                f.write_str(&faster_hex::hex_string(&prefix[..prefix.len() - SEP_SIZE]))?; // Drop `SEP`
                f.write_str("/")?;
            }
        }
        f.write_str(&faster_hex::hex_string(key))
    }
}

impl Debug for DbKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let key = DbKey::new(&[1], 7u32.to_be_bytes());
        assert_eq!(key.as_ref(), &[1, SEP, 0, 0, 0, 7]);
        assert_eq!(key.prefix_len(), 2);
    }

    #[test]
    fn test_key_display() {
        let key1 = DbKey::new(b"human-readable", 34567890u32.to_be_bytes());
        let key2 = DbKey::new(&[0xC0, 0xC1, 0xF5, 0xF6], 345690u32.to_be_bytes()); // invalid UTF-8
        let key3 = DbKey::new(&[1], [0xAB]);
        let key4 = DbKey::prefix_only(&[0xC0, 0xC1, 0xF5, 0xF6]);
        let key5 = DbKey::prefix_only(b"direct-prefix");

        assert_eq!(key1.to_string(), "human-readable/020f76d2");
        assert!(key2.to_string().starts_with("c0c1f5f6/"));
        assert_eq!(key3.to_string(), "01/ab");
        assert_eq!(key4.to_string(), "c0c1f5f6/");
        assert_eq!(key5.to_string(), "direct-prefix/");
    }
}
