use crate::prelude::DB;
use std::sync::Weak;
use tempfile::TempDir;

/// Keeps a temporary DB directory alive and destroys the DB once every strong
/// reference to it is gone. Returned by [`create_temp_db`](crate::create_temp_db).
pub struct DbLifetime {
    weak_db_ref: Weak<DB>,
    optional_tempdir: Option<TempDir>,
}

impl DbLifetime {
    pub fn new(tempdir: TempDir, weak_db_ref: Weak<DB>) -> Self {
        Self { optional_tempdir: Some(tempdir), weak_db_ref }
    }
}

impl Drop for DbLifetime {
    fn drop(&mut self) {
        for _ in 0..16 {
            if self.weak_db_ref.strong_count() > 0 {
                // Sometimes another thread is shuting-down and cleaning resources
                std::thread::sleep(std::time::Duration::from_millis(100));
            } else {
                break;
            }
        }
        assert_eq!(self.weak_db_ref.strong_count(), 0, "DB is expected to have no strong references when lifetime is dropped");
        if let Some(dir) = self.optional_tempdir.take() {
            let options = rocksdb::Options::default();
            DB::destroy(&options, dir.path()).expect("DB is expected to be deletable since there are no references to it");
        }
    }
}

pub fn get_blockdag_tempdir() -> TempDir {
    let global_tempdir = std::env::temp_dir();
    let blockdag_tempdir = global_tempdir.join("blockdag");
    std::fs::create_dir_all(blockdag_tempdir.as_path()).unwrap();
    tempfile::tempdir_in(blockdag_tempdir.as_path()).unwrap()
}

/// Creates a DB within a temp directory under `<OS SPECIFIC TEMP DIR>/blockdag`
/// Callers must keep the `DbLifetime` guard for as long as they wish the DB to exist.
#[macro_export]
macro_rules! create_temp_db {
    ($conn_builder: expr) => {{
        let db_tempdir = $crate::utils::get_blockdag_tempdir();
        let db_path = db_tempdir.path().to_owned();
        let db = $conn_builder.with_db_path(db_path).build().unwrap();
        ($crate::utils::DbLifetime::new(db_tempdir, std::sync::Arc::downgrade(&db)), db)
    }};
}
