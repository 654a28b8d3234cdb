use std::collections::BTreeMap;

use roster_utils::IsoWeek;
use serde::{Deserialize, Serialize};
use time::Date;

/// A closed `[start_date, end_date]` interval. Policy-dependent
/// classification (working days, blocked days) lives in `roster-calendar`;
/// this type only carries the raw interval and pure date arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningHorizon {
    pub start_date: Date,
    pub end_date: Date,
}

impl PlanningHorizon {
    pub fn new(start_date: Date, end_date: Date) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn is_empty_or_inverted(&self) -> bool {
        self.end_date < self.start_date
    }

    /// Every calendar date in the horizon, inclusive of both ends.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        roster_utils::date_range(self.start_date, self.end_date)
    }

    /// All horizon dates, grouped by ISO `(year, week)` in ascending order,
    /// ported from the teacher's `ShiftyWeek`/`ShiftyWeekIterator` grouping.
    pub fn iso_weeks(&self) -> BTreeMap<IsoWeek, Vec<Date>> {
        let mut weeks: BTreeMap<IsoWeek, Vec<Date>> = BTreeMap::new();
        for date in self.dates() {
            weeks.entry(IsoWeek::of(date)).or_default().push(date);
        }
        weeks
    }
}
