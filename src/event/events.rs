use crate::color::HexColor;
use crate::snapshot::{Snapshot, SnapshotError};

/// Payload of the palette's colors-changed channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteColors {
    pub defaults: Vec<HexColor>,
    pub custom: Vec<Option<HexColor>>,
}

/// Fired when the visible content must be replaced by the snapshot at `cursor`
#[derive(Debug, Clone)]
pub struct HistoryMove {
    pub cursor: usize,
    pub snapshot: Snapshot,
}

/// Fired when undo/redo availability may have changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStatus {
    pub cursor: usize,
    pub step_count: usize,
}

impl HistoryStatus {
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.step_count
    }
}

/// A snapshot restore that could not be applied. The render target keeps its
/// previous contents.
#[derive(Debug, Clone)]
pub struct DecodeFailure {
    pub cursor: usize,
    pub error: SnapshotError,
}
