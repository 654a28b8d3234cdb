use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::Date;

/// A worker the core schedules. Immutable for the duration of a solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    pub name: Arc<str>,
    /// Must be a multiple of 8; validated by `Problem::validate`.
    pub weekly_hours_cap: u32,
    pub absence_dates: HashSet<Date>,
    pub preferred_shifts: HashSet<u64>,
}

impl Employee {
    pub fn new(id: u64, name: impl Into<Arc<str>>, weekly_hours_cap: u32) -> Self {
        Self {
            id,
            name: name.into(),
            weekly_hours_cap,
            absence_dates: HashSet::new(),
            preferred_shifts: HashSet::new(),
        }
    }

    pub fn with_absences(mut self, absence_dates: impl IntoIterator<Item = Date>) -> Self {
        self.absence_dates = absence_dates.into_iter().collect();
        self
    }

    pub fn with_preferred_shifts(mut self, shift_ids: impl IntoIterator<Item = u64>) -> Self {
        self.preferred_shifts = shift_ids.into_iter().collect();
        self
    }

    pub fn is_absent(&self, date: Date) -> bool {
        self.absence_dates.contains(&date)
    }

    pub fn prefers(&self, shift_id: u64) -> bool {
        self.preferred_shifts.contains(&shift_id)
    }
}
