use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::models::ProgramMap;

/// Write the full program map as one pretty-printed JSON document.
/// The snapshot is replaced wholesale: written to a sibling temp file,
/// then renamed over the target, so readers never observe a partial write.
pub fn save(path: &Path, programs: &ProgramMap) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create snapshot dir {}", dir.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    let file = File::create(&tmp)
        .with_context(|| format!("failed to create snapshot {}", tmp.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), programs)?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move snapshot into place at {}", path.display()))?;
    tracing::info!(path = %path.display(), programs = programs.len(), "snapshot saved");
    Ok(())
}

/// Read the full program map back. Fails when the snapshot is absent or
/// unparseable; callers decide whether that triggers a fresh ingest.
pub fn load(path: &Path) -> Result<ProgramMap> {
    let file = File::open(path)
        .with_context(|| format!("failed to open snapshot {}", path.display()))?;
    let programs = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    Ok(programs)
}

pub fn exists(path: &Path) -> bool {
    path.is_file()
}
