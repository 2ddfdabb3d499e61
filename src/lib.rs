//! A minesweeper agent that plays by proof instead of luck.
//!
//! Revealed hints become logical constraints over their unknown neighbors,
//! accumulated in an append-only knowledge base. A cell is probed or flagged
//! only when a satisfiability check proves it must be safe or must be a mine;
//! when nothing is provable the agent gives up rather than guess.
//!
//! Two interchangeable constraint encodings are provided, an enumerative
//! DNF and an at-most/at-least CNF decomposition, both checked through the
//! same varisat-backed oracle.

pub mod agent;
pub mod encode;
pub mod error;
pub mod grid;
pub mod logic;
pub mod oracle;
pub mod world;

pub use agent::{PlayOutcome, SatAgent, SinglePointAgent};
pub use encode::{DecompositionEncoder, EnumerativeEncoder, HintEncoder};
pub use error::{EngineError, LayoutError};
pub use grid::{CellId, CellIds, CellView, GridView, Point};
pub use logic::{ClauseGrouping, Formula, KnowledgeBase, Literal};
pub use oracle::{SatOracle, VarisatOracle, Verdict};
pub use world::{Game, World, WorldCell};
