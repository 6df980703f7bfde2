use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use pb_core::{Ledger, Result};

/// Flat-file ledger: one canonical paper id per line, append-only.
///
/// The file is read wholesale at open time; `record` appends a line and
/// keeps the in-memory set current, so membership reflects writes made
/// earlier in the same run. Entries are never removed or compacted.
pub struct FileLedger {
    path: PathBuf,
    seen: RwLock<HashSet<String>>,
}

impl FileLedger {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut seen = HashSet::new();
        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            for line in reader.lines() {
                let line = line?;
                let id = line.trim();
                if !id.is_empty() {
                    seen.insert(id.to_string());
                }
            }
        }

        Ok(Self {
            path,
            seen: RwLock::new(seen),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Ledger for FileLedger {
    async fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.seen.read().await.contains(id))
    }

    async fn record(&self, id: &str) -> Result<()> {
        let mut seen = self.seen.write().await;
        if seen.contains(id) {
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", id)?;
        seen.insert(id.to_string());
        Ok(())
    }
}
