//! Block index stores and the one-time upgrade of the block index from the
//! legacy hash-referencing record layout to the current id-referencing one.
//!
//! The upgrade decodes legacy records in id order, resolving every hash
//! reference through a [`BlockResolver`](upgrade::resolver::BlockResolver)
//! populated by the records decoded before it, then re-persists all blocks
//! in the current format. A whole-database run is sequenced by
//! [`DbUpgrader`](upgrade::upgrader::DbUpgrader) inside a single write batch.

pub mod model;
pub mod test_helpers;
pub mod upgrade;
