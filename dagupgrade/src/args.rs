use blockdag_consensus_core::config::{UpgradeConfig, constants::DEFAULT_PROGRESS_LOG_INTERVAL};
use clap::Parser;
use std::path::PathBuf;

const DEFAULT_FILES_LIMIT: i32 = 512;

/// Upgrades a BlockDAG database from the legacy block index format
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory of the database to upgrade
    #[arg(long = "db-dir")]
    pub db_dir: PathBuf,

    /// Logging filters, e.g. `info` or `info,blockdag_consensus=trace`
    #[arg(long = "loglevel", default_value = "info")]
    pub log_level: String,

    /// Directory for rolling log files. Logs only go to the console if omitted
    #[arg(long)]
    pub logdir: Option<PathBuf>,

    /// Number of legacy records to migrate, overriding the count recorded in the database.
    /// Must not be below the recorded count
    #[arg(long)]
    pub block_total: Option<u64>,

    /// Log upgrade progress every this many records
    #[arg(long, default_value_t = DEFAULT_PROGRESS_LOG_INTERVAL)]
    pub progress_interval: u32,

    /// Max number of files the database may keep open
    #[arg(long, default_value_t = DEFAULT_FILES_LIMIT)]
    pub files_limit: i32,
}

impl Args {
    pub fn upgrade_config(&self) -> UpgradeConfig {
        UpgradeConfig::default().with_progress_log_interval(self.progress_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["dagupgrade", "--db-dir", "/data/dag"]).unwrap();
        assert_eq!(args.db_dir, PathBuf::from("/data/dag"));
        assert_eq!(args.log_level, "info");
        assert!(args.logdir.is_none());
        assert!(args.block_total.is_none());
        assert_eq!(args.upgrade_config(), UpgradeConfig::default());
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "dagupgrade",
            "--db-dir",
            "/data/dag",
            "--loglevel",
            "debug",
            "--logdir",
            "/var/log/dag",
            "--block-total",
            "1200",
            "--progress-interval",
            "100",
        ])
        .unwrap();
        assert_eq!(args.log_level, "debug");
        assert_eq!(args.logdir, Some(PathBuf::from("/var/log/dag")));
        assert_eq!(args.block_total, Some(1200));
        assert_eq!(args.upgrade_config().progress_log_interval, 100);
    }

    #[test]
    fn test_db_dir_is_required() {
        assert!(Args::try_parse_from(["dagupgrade"]).is_err());
    }
}
