//! Chart requests and the datasets built from them.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::aggregate::{RankedEntry, aggregate};
use crate::chapters::{ChapterFilter, ChapterSpec};
use crate::error::{PovError, PovResult};
use crate::ranking::{Ranking, Selection, reduce};
use crate::registry::{NameRegistry, OTHER};
use crate::scene::{CountMode, SceneLog};

/// The kind of chart to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// One slice per character.
    Pie,
    /// One bar per character; `Other` is not drawn.
    Bar,
    /// One stacked column per chapter.
    StackedBar,
}

impl FromStr for ChartKind {
    type Err = PovError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match normalized.as_str() {
            "pie" => Ok(Self::Pie),
            "bar" => Ok(Self::Bar),
            "stackedbar" | "stacked" => Ok(Self::StackedBar),
            _ => Err(PovError::InvalidChartKind(s.trim().to_string())),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pie => write!(f, "pie"),
            Self::Bar => write!(f, "bar"),
            Self::StackedBar => write!(f, "stacked bar"),
        }
    }
}

/// Parse the number of characters to display.
pub fn parse_count(s: &str) -> PovResult<usize> {
    s.trim()
        .parse()
        .map_err(|_| PovError::InvalidCount(s.trim().to_string()))
}

/// Everything needed to build one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    /// Chart kind.
    pub kind: ChartKind,
    /// Chapters to include.
    pub chapters: ChapterSpec,
    /// Chart title, if any.
    pub title: Option<String>,
    /// Identity view and pov-only switch.
    pub mode: CountMode,
    /// Number of characters shown individually.
    pub count: usize,
}

impl ChartRequest {
    /// A request for `kind` over all chapters showing ten characters.
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            chapters: ChapterSpec::all(),
            title: None,
            mode: CountMode::default(),
            count: 10,
        }
    }

    /// Set the chapter selection.
    pub fn with_chapters(mut self, chapters: ChapterSpec) -> Self {
        self.chapters = chapters;
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Set the counting mode.
    pub fn with_mode(mut self, mode: CountMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the number of characters shown individually.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// One column of a stacked bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackedColumn {
    /// Column label (the chapter number).
    pub label: String,
    /// The column's ranking over the shared series names.
    pub ranking: Ranking,
}

/// Columns sharing one series set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackedData {
    /// Series names in stacking order, `Other` last.
    pub series: Vec<String>,
    /// One column per chapter.
    pub columns: Vec<StackedColumn>,
}

impl StackedData {
    /// Values of `series` across columns; zero where a column lacks it.
    pub fn values(&self, series: &str) -> Vec<u64> {
        self.columns
            .iter()
            .map(|c| c.ranking.get(series).unwrap_or(0))
            .collect()
    }

    /// Sum of each column.
    pub fn column_totals(&self) -> Vec<u64> {
        self.columns.iter().map(|c| c.ranking.total()).collect()
    }
}

/// Data to plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ChartData {
    /// Slices, `Other` last.
    Pie(Ranking),
    /// Bars without `Other`.
    Bar(Vec<RankedEntry>),
    /// Stacked columns.
    StackedBar(StackedData),
}

/// A fully built chart ready for a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chart {
    /// Chart title, if any.
    pub title: Option<String>,
    /// Plotted data.
    pub data: ChartData,
}

impl Chart {
    /// The kind of chart this is.
    pub fn kind(&self) -> ChartKind {
        match self.data {
            ChartData::Pie(_) => ChartKind::Pie,
            ChartData::Bar(_) => ChartKind::Bar,
            ChartData::StackedBar(_) => ChartKind::StackedBar,
        }
    }
}

/// The loaded inputs: name registry and scene log.
#[derive(Debug, Clone)]
pub struct Corpus {
    /// Character lookup.
    pub registry: NameRegistry,
    /// Every scene.
    pub scenes: SceneLog,
}

impl Corpus {
    /// Parse both tables from text.
    pub fn parse(lookup: &str, scenes: &str) -> PovResult<Self> {
        let registry = NameRegistry::parse("<lookup>", lookup)?;
        let scenes = SceneLog::parse("<scenes>", scenes, &registry)?;
        Ok(Self { registry, scenes })
    }

    /// Read both tables from disk.
    pub fn load(lookup: &Path, scenes: &Path) -> PovResult<Self> {
        let lookup_text = read(lookup)?;
        let scene_text = read(scenes)?;
        let registry = NameRegistry::parse(&lookup.display().to_string(), &lookup_text)?;
        let scenes = SceneLog::parse(&scenes.display().to_string(), &scene_text, &registry)?;
        Ok(Self { registry, scenes })
    }

    /// Aggregate and reduce over `filter`.
    pub fn rank(
        &self,
        filter: &ChapterFilter,
        mode: CountMode,
        selection: &Selection,
    ) -> PovResult<Ranking> {
        let tally = aggregate(
            self.registry.known_names(),
            self.scenes.scenes(),
            filter,
            mode,
        )?;
        Ok(reduce(&tally, selection))
    }

    /// Build the chart described by `request`.
    pub fn chart(&self, request: &ChartRequest) -> PovResult<Chart> {
        let filter = request.chapters.filter();
        let top = self.rank(&filter, request.mode, &Selection::Top(request.count))?;

        let data = match request.kind {
            ChartKind::Pie => ChartData::Pie(top),
            ChartKind::Bar => ChartData::Bar(top.retained().to_vec()),
            ChartKind::StackedBar => ChartData::StackedBar(self.stacked(request, &top)?),
        };

        tracing::debug!(kind = %request.kind, count = request.count, "built chart");
        Ok(Chart {
            title: request.title.clone(),
            data,
        })
    }

    fn stacked(&self, request: &ChartRequest, top: &Ranking) -> PovResult<StackedData> {
        let names: BTreeSet<String> = top.names().map(str::to_string).collect();
        let selection = Selection::Only(names);

        let columns = request
            .chapters
            .columns(&self.scenes.chapters())
            .into_iter()
            .map(|chapter| -> PovResult<StackedColumn> {
                let ranking =
                    self.rank(&ChapterFilter::single(chapter), request.mode, &selection)?;
                Ok(StackedColumn {
                    label: chapter.to_string(),
                    ranking,
                })
            })
            .collect::<PovResult<Vec<_>>>()?;

        let series = top
            .names()
            .map(str::to_string)
            .chain(std::iter::once(OTHER.to_string()))
            .collect();

        Ok(StackedData { series, columns })
    }
}

fn read(path: &Path) -> PovResult<String> {
    std::fs::read_to_string(path).map_err(|source| PovError::Io {
        path: path.to_path_buf(),
        source,
    })
}
