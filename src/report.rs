use crate::key::AdminKey;

/// One oversized group left unwritten.
#[derive(Debug, Clone)]
pub struct SkippedGroup {
    pub key: AdminKey,
    pub count: usize,
}

/// Accounting for one import run, threaded through every stage and
/// rendered once at the end. The summary is a pure formatting step; it
/// never affects control flow.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Records successfully written, including chunked oversized groups.
    pub inserted: usize,
    /// Groups with more than one shape, including chunked groups.
    pub merged: usize,
    /// Oversized groups that went through chunked processing.
    pub chunked: usize,
    /// Shapes dropped because their key already existed in the store.
    pub duplicate_skipped: usize,
    /// Groups skipped for exceeding the size limits.
    pub oversized_skipped: usize,
    /// Shape-, group-, and write-level failures.
    pub errors: usize,
    /// Messages for the failures counted above, retained for reporting.
    pub failures: Vec<String>,
    /// Detail for each oversized-skipped group.
    pub skipped: Vec<SkippedGroup>,
}

impl RunResult {
    pub fn record_failure(&mut self, message: String) {
        self.errors += 1;
        self.failures.push(message);
    }

    /// Skipped oversized groups, largest first.
    pub fn skipped_sorted(&self) -> Vec<&SkippedGroup> {
        let mut sorted: Vec<_> = self.skipped.iter().collect();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }

    /// Human-readable run summary.
    pub fn summary(&self, skip_threshold: usize) -> String {
        let mut out = String::new();
        out.push_str("Import finished:\n");
        out.push_str(&format!("  - inserted: {}\n", self.inserted));
        out.push_str(&format!("  - merged: {}\n", self.merged));
        out.push_str(&format!("  - chunked oversized groups: {}\n", self.chunked));
        out.push_str(&format!("  - duplicate skipped: {}\n", self.duplicate_skipped));
        out.push_str(&format!("  - oversized skipped: {}\n", self.oversized_skipped));
        out.push_str(&format!("  - errors: {}", self.errors));

        if !self.skipped.is_empty() {
            out.push_str(&format!(
                "\n\nSkipped {} units over the {}-shape threshold:\n",
                self.skipped.len(),
                skip_threshold,
            ));
            for group in self.skipped_sorted() {
                out.push_str(&format!("  - {}: {} shapes\n", group.key, group.count));
            }
            out.push_str("Raise --skip-threshold or import these units separately.");
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::AdminKey;

    #[test]
    fn skipped_groups_sort_by_count_descending() {
        let mut result = RunResult::default();
        for (city, count) in [("A市", 120), ("B市", 7000), ("C市", 1500)] {
            result.skipped.push(SkippedGroup {
                key: AdminKey::new("東京都", Some(city.into()), None),
                count,
            });
        }
        let counts: Vec<_> = result.skipped_sorted().iter().map(|g| g.count).collect();
        assert_eq!(counts, vec![7000, 1500, 120]);
    }

    #[test]
    fn summary_lists_skipped_units() {
        let mut result = RunResult::default();
        result.inserted = 3;
        result.skipped.push(SkippedGroup {
            key: AdminKey::new("東京都", Some("B市".into()), None),
            count: 6000,
        });
        let summary = result.summary(5000);
        assert!(summary.contains("inserted: 3"));
        assert!(summary.contains("東京都-B市-NULL: 6000 shapes"));
    }
}
