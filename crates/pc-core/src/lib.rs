//! Core of POV Count: per-character word statistics for a narrative work.
//!
//! Two flat tables feed the model: a character lookup (`alias;canonical`)
//! loaded into a [`NameRegistry`], and a scene log
//! (`chapter;pov;featured,...;words`) loaded into a [`SceneLog`]. Word counts
//! are summed per character with [`aggregate`] and cut down to the characters
//! worth charting with [`reduce`]. [`Corpus::chart`] ties the steps together
//! and produces a [`Chart`] for a renderer.

/// Word-count aggregation over scenes.
pub mod aggregate;
/// Chapter selections and filters.
pub mod chapters;
/// Error types used throughout the crate.
pub mod error;
/// Top-N and allow-list reduction.
pub mod ranking;
/// Character alias lookup.
pub mod registry;
pub mod report;
/// Scene records and the scene log.
pub mod scene;

/// Re-export aggregation types.
pub use aggregate::{RankedEntry, Tally, aggregate};
/// Re-export chapter types.
pub use chapters::{ChapterFilter, ChapterSpec};
/// Re-export error types.
pub use error::{Location, PovError, PovResult};
/// Re-export ranking types.
pub use ranking::{Ranking, Selection, reduce};
/// Re-export registry types.
pub use registry::{NameRegistry, OTHER};
/// Re-export chart request types.
pub use report::{Chart, ChartData, ChartKind, ChartRequest, Corpus, StackedColumn, StackedData};
/// Re-export scene types.
pub use scene::{Appearance, CountMode, Scene, SceneLog};
