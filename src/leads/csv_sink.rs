//! CSV lead persistence.
//!
//! Appends one row per lead. The header row is written when the file is
//! new or empty, so the file can be deleted at any time to start over.

use async_trait::async_trait;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

use super::{Lead, LeadSink, SinkError};

/// Column titles, in `Lead` field order.
pub const CSV_HEADERS: [&str; 6] = ["Timestamp", "Name", "Phone", "ZIP", "Project", "Details"];

/// Appends leads to a CSV file on disk.
pub struct CsvLeadSink {
    path: PathBuf,
    /// Serialises appends so concurrent rows never interleave.
    write_lock: Arc<Mutex<()>>,
}

impl CsvLeadSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait]
impl LeadSink for CsvLeadSink {
    async fn record(&self, lead: &Lead) -> Result<(), SinkError> {
        let path = self.path.clone();
        let lead = lead.clone();
        let lock = Arc::clone(&self.write_lock);

        tokio::task::spawn_blocking(move || {
            let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            append_row(&path, &lead)
        })
        .await??;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

/// Append a single lead, writing the header first if needed.
fn append_row(path: &Path, lead: &Lead) -> Result<(), SinkError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if needs_header {
        writer.write_record(CSV_HEADERS)?;
    }
    writer.serialize(lead)?;
    writer.flush()?;

    debug!(path = %path.display(), header = needs_header, "Lead row appended");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
