//! Data directory bootstrap.

use super::{JsonStore, StoreError, StoreResult};
use crate::model::record::Topic;
use log::{error, info};
use std::path::Path;
use std::time::Instant;

/// Opens a data directory, creating it and any missing topic files.
///
/// Missing list topics are seeded with `[]`, missing settings with `{}`.
/// Existing files are left untouched, even when malformed.
///
/// # Side effects
/// - Emits `store_open` log events with duration and seeded file count.
pub fn open_store(data_dir: impl AsRef<Path>) -> StoreResult<JsonStore> {
    let started_at = Instant::now();
    let data_dir = data_dir.as_ref();
    info!(
        "event=store_open module=store status=start data_dir={}",
        data_dir.display()
    );

    match bootstrap_dir(data_dir) {
        Ok(seeded) => {
            info!(
                "event=store_open module=store status=ok duration_ms={} seeded_files={}",
                started_at.elapsed().as_millis(),
                seeded
            );
            Ok(JsonStore::new(data_dir.to_path_buf()))
        }
        Err(err) => {
            error!(
                "event=store_open module=store status=error duration_ms={} error_code=store_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_dir(data_dir: &Path) -> StoreResult<usize> {
    std::fs::create_dir_all(data_dir).map_err(|source| StoreError::Io {
        topic: None,
        source,
    })?;

    let mut seeded = 0;
    for topic in Topic::ALL {
        let path = data_dir.join(topic.file_name());
        if path.exists() {
            continue;
        }
        let empty = if topic.is_list() { "[]" } else { "{}" };
        std::fs::write(&path, empty).map_err(|err| StoreError::io(topic, err))?;
        seeded += 1;
    }
    Ok(seeded)
}
