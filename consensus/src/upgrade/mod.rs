pub mod driver;
pub mod legacy;
pub mod resolver;
pub mod upgrader;

pub use driver::{BlockIndexUpgrade, UpgradeSummary};
pub use legacy::{LegacyBlockDecoder, LegacyBlockRecord, decode_legacy_block, encode_legacy_block};
pub use resolver::{BlockResolver, BlockResolverReader};
pub use upgrader::DbUpgrader;
