//! A [`StateDiffSource`](crate::StateDiffSource) that reads one state diff
//! from a JSON file, for local testing and replay - there is no feeder-
//! gateway or L1 client in this workspace.
use std::path::Path;

use serde::Deserialize;
use starkstate_common::{Felt, StateDiff};

use crate::StateDiffSource;

#[derive(Deserialize)]
struct DiffFile {
    #[serde(flatten)]
    diff: StateDiff,
    expected_root: Option<Felt>,
    sequence_number: u64,
}

/// Yields exactly one diff (parsed eagerly in [`JsonFileSource::from_path`]),
/// then `None` on every subsequent call.
pub struct JsonFileSource {
    pending: Option<DiffFile>,
}

impl JsonFileSource {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading diff file {}: {e}", path.display()))?;
        let parsed: DiffFile = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("parsing diff file {}: {e}", path.display()))?;
        Ok(Self { pending: Some(parsed) })
    }
}

impl StateDiffSource for JsonFileSource {
    fn next(&mut self) -> anyhow::Result<Option<(StateDiff, Option<Felt>, u64)>> {
        Ok(self.pending.take().map(|f| (f.diff, f.expected_root, f.sequence_number)))
    }
}
