use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::matcher::MatchOutcome;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    pub correct_match: usize,
    pub incorrect_match: usize,
    pub errors: usize,
    pub total: usize,
}

impl CategoryStats {
    fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            ..Self::default()
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct_match as f64 / self.total as f64
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.correct_match + self.incorrect_match + self.errors == self.total
    }

    fn absorb(&mut self, other: &CategoryStats) {
        self.correct_match += other.correct_match;
        self.incorrect_match += other.incorrect_match;
        self.errors += other.errors;
        self.total += other.total;
    }
}

/// Per-category counters. Partial aggregators can be combined with
/// [`CategoryAggregator::merge`] in any order.
#[derive(Debug, Clone, Default)]
pub struct CategoryAggregator {
    categories: BTreeMap<String, CategoryStats>,
}

impl CategoryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: &str, outcome: &MatchOutcome) {
        let stats = self
            .categories
            .entry(category.to_string())
            .or_insert_with(|| CategoryStats::new(category));

        stats.total += 1;
        match outcome {
            MatchOutcome::Matched => stats.correct_match += 1,
            MatchOutcome::Errored { .. } => stats.errors += 1,
            MatchOutcome::Mismatched { .. } => {}
        }
        stats.incorrect_match = stats.total - stats.correct_match - stats.errors;
    }

    pub fn merge(&mut self, other: CategoryAggregator) {
        for (category, stats) in other.categories {
            self.categories
                .entry(category)
                .or_insert_with_key(|c| CategoryStats::new(c))
                .absorb(&stats);
        }
    }

    /// Sum over every category, labelled `overall`.
    pub fn overall(&self) -> CategoryStats {
        let mut total = CategoryStats::new("overall");
        for stats in self.categories.values() {
            total.absorb(stats);
        }
        total
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Stats sorted by category name.
    pub fn finish(self) -> Vec<CategoryStats> {
        self.categories.into_values().collect()
    }
}

/// One-shot form over `(category, outcome)` rows.
pub fn aggregate<'a, I>(rows: I) -> Vec<CategoryStats>
where
    I: IntoIterator<Item = (&'a str, &'a MatchOutcome)>,
{
    let mut aggregator = CategoryAggregator::new();
    for (category, outcome) in rows {
        aggregator.record(category, outcome);
    }
    aggregator.finish()
}
