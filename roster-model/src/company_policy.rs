use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use time::Date;

/// Policy knobs that classify calendar dates; consulted by `roster-calendar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyPolicy {
    pub sunday_is_workday: bool,
    /// Number of weekdays (starting Monday) that count as the company
    /// workweek, used by `expected_month_hours`. Must be in `5..=7`.
    pub workweek_size: u8,
    pub extra_blocked_dates: HashSet<Date>,
    /// Holiday table keyed by year, each holiday a `(month, day)` pair.
    /// Years with no entry fall back to the built-in 2024/2025/2026 tables,
    /// or fail fast for any other year unless this map supplies one.
    pub holiday_table: HashMap<i32, HashSet<(u8, u8)>>,
}

impl CompanyPolicy {
    pub fn new(sunday_is_workday: bool, workweek_size: u8) -> Self {
        Self {
            sunday_is_workday,
            workweek_size,
            extra_blocked_dates: HashSet::new(),
            holiday_table: HashMap::new(),
        }
    }

    pub fn with_extra_blocked_dates(mut self, dates: impl IntoIterator<Item = Date>) -> Self {
        self.extra_blocked_dates = dates.into_iter().collect();
        self
    }

    pub fn with_holiday_table(
        mut self,
        table: impl IntoIterator<Item = (i32, HashSet<(u8, u8)>)>,
    ) -> Self {
        self.holiday_table = table.into_iter().collect();
        self
    }
}

impl Default for CompanyPolicy {
    fn default() -> Self {
        Self::new(false, 5)
    }
}
