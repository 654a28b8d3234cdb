use serde::{Deserialize, Serialize};
use time::Date;

/// One assignment of an employee to a shift on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub employee_id: u64,
    pub date: Date,
    pub shift_id: u64,
}

impl ScheduleEntry {
    pub fn new(employee_id: u64, date: Date, shift_id: u64) -> Self {
        Self {
            employee_id,
            date,
            shift_id,
        }
    }
}

/// A multiset of assignments. Owns only ids and dates — never a reference
/// into the `Problem` that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A stable iteration order (employee, then date, then shift) so
    /// downstream reports are reproducible regardless of insertion order.
    pub fn sorted(&self) -> Vec<ScheduleEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| (e.employee_id, e.date, e.shift_id));
        entries
    }

    pub fn for_employee(&self, employee_id: u64) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter().filter(move |e| e.employee_id == employee_id)
    }

    pub fn on_date(&self, date: Date) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter().filter(move |e| e.date == date)
    }
}

impl FromIterator<ScheduleEntry> for Schedule {
    fn from_iter<T: IntoIterator<Item = ScheduleEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
