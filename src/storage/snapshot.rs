//! Reading and writing snapshot files.
//!
//! A snapshot is the pretty-printed JSON array of the records held by a
//! [`FlightStore`].

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use crate::FlightStore;

/// Errors that can occur while decoding a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotDecodeError {
    /// The snapshot could not be opened.
    #[error("failed to read snapshot: {0}")]
    Io(#[from] io::Error),

    /// The snapshot is not a JSON array of flight records.
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a store from the snapshot file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or does not decode.
pub fn load(path: &Path) -> Result<FlightStore, SnapshotDecodeError> {
    let file = File::open(path)?;
    let mut store = FlightStore::new();
    store.load_from_snapshot(BufReader::new(file))?;
    Ok(store)
}

/// Write the records held by `store` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(store: &FlightStore, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    store.export_snapshot(&mut writer)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    tracing::info!("Wrote {} flights to {}", store.len(), path.display());
    Ok(())
}
