use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::chapters::ChapterFilter;
use crate::error::{PovError, PovResult};
use crate::registry::OTHER;
use crate::scene::{CountMode, Scene};

/// A character's total word count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// Character name (canonical or alternate identity).
    pub name: String,
    /// Words attributed to the character.
    pub count: u64,
}

impl RankedEntry {
    /// Create an entry.
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Orders entries by descending count, then alphabetically by name.
pub fn rank_order(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name))
}

/// Per-character word totals for one aggregation.
///
/// The grand total fits in a `u64`, so any sum over a subset of the totals
/// does too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    counts: BTreeMap<String, u64>,
    other: u64,
    total: u64,
}

impl Tally {
    /// Total of the `Other` bucket itself.
    pub fn other(&self) -> u64 {
        self.other
    }

    /// Total for `name`, if it is a known character.
    pub fn get(&self, name: &str) -> Option<u64> {
        if name == OTHER {
            return Some(self.other);
        }
        self.counts.get(name).copied()
    }

    /// Sum of all totals, including `Other`.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Every character except `Other`, highest count first.
    pub fn ranked(&self) -> Vec<RankedEntry> {
        let mut entries: Vec<RankedEntry> = self
            .counts
            .iter()
            .map(|(name, count)| RankedEntry::new(name.clone(), *count))
            .collect();
        entries.sort_by(rank_order);
        entries
    }
}

/// Sum scene word counts per character.
///
/// Every name in `known_names` starts at zero; `known_names` must include
/// `Other`. Scenes outside `filter` are skipped. A name produced by a scene
/// that is not in `known_names` is an error, and so is a total that
/// overflows.
pub fn aggregate<'a>(
    known_names: impl IntoIterator<Item = &'a str>,
    scenes: &[Scene],
    filter: &ChapterFilter,
    mode: CountMode,
) -> PovResult<Tally> {
    let mut counts: BTreeMap<String, u64> = known_names
        .into_iter()
        .map(|name| (name.to_string(), 0))
        .collect();
    let mut other = counts.remove(OTHER).ok_or(PovError::MissingOtherBucket)?;

    let mut total = 0u64;
    let mut included = 0usize;
    for scene in scenes.iter().filter(|s| filter.includes(s.chapter)) {
        included += 1;
        for name in scene.get_all_chars(mode) {
            let slot = if name == OTHER {
                &mut other
            } else {
                counts
                    .get_mut(name)
                    .ok_or_else(|| PovError::UnknownCharacterName(name.to_string()))?
            };
            let overflow = || PovError::WordCountOverflow(name.to_string());
            *slot = slot.checked_add(scene.word_count).ok_or_else(overflow)?;
            total = total.checked_add(scene.word_count).ok_or_else(overflow)?;
        }
    }

    tracing::debug!(
        scenes = included,
        alternate_identities = mode.alternate_identities,
        pov_only = mode.pov_only,
        "aggregated word counts"
    );
    Ok(Tally {
        counts,
        other,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NameRegistry;
    use crate::scene::SceneLog;

    fn fixture() -> (NameRegistry, SceneLog) {
        let reg = NameRegistry::parse("lookup", "A;Alice\nA (B);Alice\nB;Bob\nO;Other\n").unwrap();
        let log = SceneLog::parse(
            "log",
            "1;A;;100\n1;B;A;50\n2;A (B);B;30\n3;O;A;7\n",
            &reg,
        )
        .unwrap();
        (reg, log)
    }

    #[test]
    fn example_totals() {
        let (reg, log) = fixture();
        let tally = aggregate(
            reg.known_names(),
            log.scenes(),
            &ChapterFilter::single(1),
            CountMode::default(),
        )
        .unwrap();
        assert_eq!(tally.get("Alice"), Some(150));
        assert_eq!(tally.get("Bob"), Some(50));
        assert_eq!(tally.get("Other"), Some(0));
        assert_eq!(tally.total(), 200);
    }

    #[test]
    fn alternate_identity_counted_separately() {
        let (reg, log) = fixture();
        let mode = CountMode::default().with_alternate_identities(true);
        let tally = aggregate(reg.known_names(), log.scenes(), &ChapterFilter::All, mode).unwrap();
        assert_eq!(tally.get("Alice"), Some(157));
        assert_eq!(tally.get("A (B)"), Some(30));
        assert_eq!(tally.get("Bob"), Some(80));
        assert_eq!(tally.other(), 7);

        let canonical =
            aggregate(reg.known_names(), log.scenes(), &ChapterFilter::All, CountMode::default())
                .unwrap();
        assert_eq!(canonical.get("Alice"), Some(187));
        assert_eq!(canonical.get("A (B)"), Some(0));
    }

    #[test]
    fn pov_only_counts_pov() {
        let (reg, log) = fixture();
        let mode = CountMode::default().with_pov_only(true);
        let tally = aggregate(reg.known_names(), log.scenes(), &ChapterFilter::All, mode).unwrap();
        assert_eq!(tally.get("Alice"), Some(130));
        assert_eq!(tally.get("Bob"), Some(50));
        assert_eq!(tally.other(), 7);
    }

    #[test]
    fn unknown_name_is_fatal() {
        let (_, log) = fixture();
        let err = aggregate(
            ["Alice", "Other"],
            log.scenes(),
            &ChapterFilter::All,
            CountMode::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PovError::UnknownCharacterName(name) if name == "Bob"));
    }

    #[test]
    fn other_bucket_required() {
        let (_, log) = fixture();
        let err = aggregate(
            ["Alice", "Bob"],
            log.scenes(),
            &ChapterFilter::All,
            CountMode::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PovError::MissingOtherBucket));
    }

    #[test]
    fn character_total_overflow_is_an_error() {
        let reg = NameRegistry::parse("lookup", "A;Alice\nO;Other\n").unwrap();
        let log = SceneLog::parse("log", "1;A;;18446744073709551615\n2;A;;1\n", &reg).unwrap();
        let err =
            aggregate(reg.known_names(), log.scenes(), &ChapterFilter::All, CountMode::default())
                .unwrap_err();
        assert!(matches!(err, PovError::WordCountOverflow(name) if name == "Alice"));
    }

    #[test]
    fn grand_total_overflow_is_an_error() {
        let reg = NameRegistry::parse("lookup", "A;Alice\nB;Bob\nO;Other\n").unwrap();
        let log = SceneLog::parse("log", "1;A;;18446744073709551615\n1;B;;1\n", &reg).unwrap();
        let err =
            aggregate(reg.known_names(), log.scenes(), &ChapterFilter::All, CountMode::default())
                .unwrap_err();
        assert!(matches!(err, PovError::WordCountOverflow(name) if name == "Bob"));

        let first = aggregate(
            reg.known_names(),
            log.scenes(),
            &ChapterFilter::single(2),
            CountMode::default(),
        )
        .unwrap();
        assert_eq!(first.total(), 0);
    }

    #[test]
    fn ranked_breaks_ties_alphabetically() {
        let reg = NameRegistry::parse("lookup", "C;Cat\nB;Bee\nA;Ant\nO;Other\n").unwrap();
        let log = SceneLog::parse("log", "1;C;;10\n1;A;;10\n1;B;;20\n", &reg).unwrap();
        let tally =
            aggregate(reg.known_names(), log.scenes(), &ChapterFilter::All, CountMode::default())
                .unwrap();
        let names: Vec<_> = tally.ranked().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Bee", "Ant", "Cat"]);
    }
}
