use std::collections::BTreeSet;

use serde::Serialize;

use crate::aggregate::{RankedEntry, Tally};
use crate::registry::OTHER;

/// How a tally is cut down to the characters shown individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Keep at most `n` characters with non-zero totals.
    Top(usize),
    /// Keep exactly these characters, whatever their totals.
    Only(BTreeSet<String>),
}

/// Characters shown individually, highest count first, plus the `Other`
/// bucket, which always comes last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking {
    retained: Vec<RankedEntry>,
    other: u64,
}

impl Ranking {
    /// Characters shown individually.
    pub fn retained(&self) -> &[RankedEntry] {
        &self.retained
    }

    /// Words folded into `Other`.
    pub fn other(&self) -> u64 {
        self.other
    }

    /// Names of the retained characters, in rank order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.retained.iter().map(|e| e.name.as_str())
    }

    /// Total for `name`, counting `Other` as the folded bucket.
    pub fn get(&self, name: &str) -> Option<u64> {
        if name == OTHER {
            return Some(self.other);
        }
        self.retained
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.count)
    }

    /// Retained entries followed by the `Other` entry.
    pub fn entries(&self) -> Vec<RankedEntry> {
        let mut entries = self.retained.clone();
        entries.push(RankedEntry::new(OTHER, self.other));
        entries
    }

    /// Number of entries including `Other`.
    pub fn len(&self) -> usize {
        self.retained.len() + 1
    }

    /// Always `false`: a ranking holds at least the `Other` entry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Sum of every entry including `Other`.
    pub fn total(&self) -> u64 {
        self.retained.iter().map(|e| e.count).sum::<u64>() + self.other
    }
}

/// Reduce a tally to the characters worth showing.
///
/// With [`Selection::Top`], the lowest-ranked characters are folded into
/// `Other` until at most `n` remain and none of them has a zero total.
/// With [`Selection::Only`], everything outside the allow-list is folded.
pub fn reduce(tally: &Tally, selection: &Selection) -> Ranking {
    let mut other = tally.other();
    let mut retained = tally.ranked();

    match selection {
        Selection::Only(names) => {
            retained.retain(|entry| {
                let keep = names.contains(&entry.name);
                if !keep {
                    other += entry.count;
                }
                keep
            });
        }
        Selection::Top(n) => {
            while let Some(last) = retained.last() {
                if retained.len() <= *n && last.count > 0 {
                    break;
                }
                other += last.count;
                retained.pop();
            }
        }
    }

    Ranking { retained, other }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::chapters::ChapterFilter;
    use crate::registry::NameRegistry;
    use crate::scene::{CountMode, SceneLog};

    fn tally(lookup: &str, log: &str, filter: &ChapterFilter) -> Tally {
        let reg = NameRegistry::parse("lookup", lookup).unwrap();
        let log = SceneLog::parse("log", log, &reg).unwrap();
        aggregate(reg.known_names(), log.scenes(), filter, CountMode::default()).unwrap()
    }

    const LOOKUP: &str = "A;Alice\nB;Bob\nC;Carol\nD;Dave\nO;Other\n";

    #[test]
    fn worked_example_top_one() {
        let t = tally(
            "A;Alice\nB;Bob\nO;Other\n",
            "1;A;;100\n1;B;A;50\n",
            &ChapterFilter::single(1),
        );
        let ranking = reduce(&t, &Selection::Top(1));
        assert_eq!(
            ranking.entries(),
            vec![RankedEntry::new("Alice", 150), RankedEntry::new("Other", 50)]
        );
    }

    #[test]
    fn zero_counts_always_folded() {
        let t = tally(LOOKUP, "1;A;;10\n1;B;;5\n", &ChapterFilter::All);
        let ranking = reduce(&t, &Selection::Top(10));
        assert_eq!(ranking.names().collect::<Vec<_>>(), vec!["Alice", "Bob"]);
        assert_eq!(ranking.other(), 0);
        assert_eq!(ranking.entries().last().unwrap().name, "Other");
    }

    #[test]
    fn top_zero_folds_everything() {
        let t = tally(LOOKUP, "1;A;;10\n1;B;;5\n", &ChapterFilter::All);
        let ranking = reduce(&t, &Selection::Top(0));
        assert!(ranking.retained().is_empty());
        assert_eq!(ranking.other(), 15);
        assert_eq!(ranking.len(), 1);
    }

    #[test]
    fn empty_tally_yields_only_other() {
        let t = tally(LOOKUP, "", &ChapterFilter::All);
        let ranking = reduce(&t, &Selection::Top(3));
        assert_eq!(ranking.entries(), vec![RankedEntry::new("Other", 0)]);
    }

    #[test]
    fn ties_fold_alphabetically_last_first() {
        let t = tally(LOOKUP, "1;A;;10\n1;C;;10\n1;B;;10\n", &ChapterFilter::All);
        let ranking = reduce(&t, &Selection::Top(2));
        assert_eq!(ranking.names().collect::<Vec<_>>(), vec!["Alice", "Bob"]);
        assert_eq!(ranking.other(), 10);
    }

    #[test]
    fn allow_list_keeps_zero_counts() {
        let t = tally(LOOKUP, "1;A;;10\n1;B;;30\n1;C;;20\n", &ChapterFilter::All);
        let names = BTreeSet::from(["Alice".to_string(), "Dave".to_string(), "Zoe".to_string()]);
        let ranking = reduce(&t, &Selection::Only(names));
        assert_eq!(
            ranking.entries(),
            vec![
                RankedEntry::new("Alice", 10),
                RankedEntry::new("Dave", 0),
                RankedEntry::new("Other", 50),
            ]
        );
    }

    #[test]
    fn get_reads_other_bucket() {
        let t = tally(LOOKUP, "1;A;;10\n1;B;;30\n", &ChapterFilter::All);
        let ranking = reduce(&t, &Selection::Top(1));
        assert_eq!(ranking.get("Bob"), Some(30));
        assert_eq!(ranking.get("Alice"), None);
        assert_eq!(ranking.get("Other"), Some(10));
        assert_eq!(ranking.total(), 40);
    }
}
