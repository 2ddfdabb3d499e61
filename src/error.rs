use crate::grid::Point;

/// Errors raised by the inference engine.
///
/// Oracle-side anomalies (backend failure, timeout) are absorbed per query
/// and never surface here; the only error that ends a session is a hint
/// constraint that cannot possibly hold, which indicates a caller bug.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The encoder was asked for `k` mines among `cell_count` cells with
    /// `k` outside `[0, cell_count]` after marked mines were subtracted.
    #[error("hint demands {k} mines among {cell_count} unknown cells")]
    EncodingContradiction { k: i32, cell_count: usize },
}

/// Errors raised while parsing a textual world layout.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("layout is empty")]
    Empty,
    #[error("row {0} has a different width than row 0")]
    RaggedRow(usize),
    #[error("unrecognized cell character '{0}'")]
    UnknownCell(char),
    #[error("mine adjacent to declared hint {0:?} makes the layout inconsistent")]
    InconsistentHint(Point),
    #[error("board must be at least 1x1, got {width}x{height}")]
    DegenerateSize { width: usize, height: usize },
    #[error("cannot place {requested} mines, only {capacity} cells lie outside the safe openings")]
    TooManyMines { requested: usize, capacity: usize },
}
