use std::collections::BTreeMap;

/// Coins granted for a correct answer, keyed on the level held *before* the
/// answer is committed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RewardTable {
    milestones: BTreeMap<u32, u64>,
    #[serde(default)]
    fallback: u64,
}

impl RewardTable {
    pub fn new(milestones: impl IntoIterator<Item = (u32, u64)>, fallback: u64) -> Self {
        Self {
            milestones: milestones.into_iter().collect(),
            fallback,
        }
    }

    /// Milestones 3, 6 and 10 paying 10, 20 and 50 coins; nothing elsewhere.
    pub fn standard() -> Self {
        Self::new([(3, 10), (6, 20), (10, 50)], 0)
    }

    /// Earlier milestone layout at levels 2, 5 and 9.
    pub fn alternate() -> Self {
        Self::new([(2, 10), (5, 20), (9, 50)], 0)
    }

    pub fn reward_for(&self, level: u32) -> u64 {
        self.milestones
            .get(&level)
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn milestone(&self, level: u32) -> Option<u64> {
        self.milestones.get(&level).copied()
    }

    pub fn milestones(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.milestones
            .iter()
            .map(|(level, reward)| (*level, *reward))
    }
}

impl Default for RewardTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_pays_milestones_only() {
        let table = RewardTable::standard();

        assert_eq!(table.reward_for(3), 10);
        assert_eq!(table.reward_for(6), 20);
        assert_eq!(table.reward_for(10), 50);
        for level in [0, 1, 2, 4, 5, 7, 8, 9, 11] {
            assert_eq!(table.reward_for(level), 0, "level {level}");
        }
    }

    #[test]
    fn fallback_applies_off_milestone() {
        let table = RewardTable::new([(2, 10)], 1);

        assert_eq!(table.reward_for(2), 10);
        assert_eq!(table.reward_for(4), 1);
        assert_eq!(table.milestone(4), None);
    }

    #[test]
    fn parses_from_json_with_numeric_keys() {
        let table: RewardTable =
            serde_json::from_str(r#"{"milestones":{"2":10,"5":20,"9":50}}"#)
                .expect("table should parse");

        assert_eq!(table, RewardTable::alternate());
    }
}
