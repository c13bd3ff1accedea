use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::PovError;

/// Which chapters an aggregation covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChapterFilter {
    /// Every chapter.
    #[default]
    All,
    /// An inclusive chapter range.
    Range(RangeInclusive<u32>),
    /// Only the listed chapters.
    Only(BTreeSet<u32>),
}

impl ChapterFilter {
    /// Whether scenes from `chapter` are included.
    pub fn includes(&self, chapter: u32) -> bool {
        match self {
            Self::All => true,
            Self::Range(range) => range.contains(&chapter),
            Self::Only(set) => set.is_empty() || set.contains(&chapter),
        }
    }

    /// Filter for a single chapter.
    pub fn single(chapter: u32) -> Self {
        Self::Only(BTreeSet::from([chapter]))
    }
}

/// A parsed chapter selection such as `5`, `1-4`, `1,3,7` or `all`.
///
/// A listed order is preserved; it becomes the column order of stacked bar
/// charts. Ranges are kept as bounds and never expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChapterSpec {
    /// Every chapter.
    #[default]
    All,
    /// An inclusive range, `first <= last`.
    Range(RangeInclusive<u32>),
    /// Explicit chapters in input order, without duplicates.
    List(Vec<u32>),
}

impl ChapterSpec {
    /// Selection covering every chapter.
    pub fn all() -> Self {
        Self::All
    }

    /// Selection of the given chapters (duplicates dropped, first kept).
    /// An empty list selects every chapter.
    pub fn from_chapters(chapters: impl IntoIterator<Item = u32>) -> Self {
        let mut seen = BTreeSet::new();
        let chapters: Vec<u32> = chapters.into_iter().filter(|c| seen.insert(*c)).collect();
        if chapters.is_empty() {
            Self::All
        } else {
            Self::List(chapters)
        }
    }

    /// Whether this selects every chapter.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The aggregation filter for this selection.
    pub fn filter(&self) -> ChapterFilter {
        match self {
            Self::All => ChapterFilter::All,
            Self::Range(range) => ChapterFilter::Range(range.clone()),
            Self::List(chapters) => ChapterFilter::Only(chapters.iter().copied().collect()),
        }
    }

    /// Chapters to draw as stacked bar columns, given the ascending chapters
    /// `present` in the scene log.
    ///
    /// `All` and ranges yield the present chapters they cover; a list yields
    /// exactly the listed chapters.
    pub fn columns(&self, present: &[u32]) -> Vec<u32> {
        match self {
            Self::All => present.to_vec(),
            Self::Range(range) => present
                .iter()
                .copied()
                .filter(|c| range.contains(c))
                .collect(),
            Self::List(chapters) => chapters.clone(),
        }
    }
}

impl FromStr for ChapterSpec {
    type Err = PovError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || PovError::InvalidChapterSpec(s.to_string());
        let number = |part: &str| part.trim().parse::<u32>().map_err(|_| invalid());

        if text.is_empty() || text.eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }

        if let Some((first, last)) = text.split_once('-') {
            if last.contains('-') || text.contains(',') {
                return Err(invalid());
            }
            let (first, last) = (number(first)?, number(last)?);
            if first > last {
                return Err(invalid());
            }
            return Ok(Self::Range(first..=last));
        }

        if text.contains(',') {
            let chapters = text.split(',').map(number).collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::from_chapters(chapters));
        }

        Ok(Self::List(vec![number(text)?]))
    }
}
