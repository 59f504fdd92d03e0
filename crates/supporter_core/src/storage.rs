use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::model::FaqEntry;

/// Reads a corpus file: a JSON array of entry records.
pub fn load_entries(path: &Path) -> Result<Vec<FaqEntry>> {
    let file = File::open(path)?;
    let entries: Vec<FaqEntry> = serde_json::from_reader(BufReader::new(file))?;
    Ok(entries)
}

/// Writes a corpus file, pretty-printed for manual curation.
pub fn save_entries(path: &Path, entries: &[FaqEntry]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writer.flush()?;
    Ok(())
}

/// A missing or malformed corpus file degrades to an empty corpus: the
/// matcher then answers not-found for everything instead of taking the
/// process down. The failure is logged, not raised.
pub fn load_entries_or_empty(path: &Path) -> Vec<FaqEntry> {
    match load_entries(path) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(
                corpus = %path.display(),
                error = %err,
                "failed to load corpus, continuing with an empty one"
            );
            Vec::new()
        }
    }
}
