use std::fmt::{Display, Formatter};

use thiserror::Error;
use time::{Date, Weekday};

#[derive(Debug, Error)]
pub enum RosterUtilsError {
    #[error("invalid date: {0}")]
    DateError(#[from] time::error::ComponentRange),
}

/// An ISO-8601 `(year, week)` pair, independent of the weekday within the week.
///
/// Mirrors the role of the teacher's `ShiftyWeek`, but keyed purely off
/// `time::Date` since this core has no database rows to address by a
/// composite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoWeek {
    pub year: i32,
    pub week: u8,
}

impl IsoWeek {
    pub fn new(year: i32, week: u8) -> Self {
        if week > time::util::weeks_in_year(year) {
            Self {
                year: year + 1,
                week: week - time::util::weeks_in_year(year),
            }
        } else {
            Self { year, week }
        }
    }

    pub fn of(date: Date) -> Self {
        let (year, week, _) = date.to_iso_week_date();
        Self { year, week }
    }

    /// The Monday of this ISO week. Fails if `week` doesn't exist in `year`
    /// (e.g. a `week` built directly rather than through `new`/`of`).
    pub fn first_date(&self) -> Result<Date, RosterUtilsError> {
        Ok(Date::from_iso_week_date(self.year, self.week, Weekday::Monday)?)
    }

    pub fn next(&self) -> Self {
        if time::util::weeks_in_year(self.year) == self.week {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.week + 1)
        }
    }

    pub fn iter_until(&self, end: Self) -> IsoWeekIter {
        IsoWeekIter {
            current: *self,
            end,
        }
    }
}

impl Display for IsoWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl From<Date> for IsoWeek {
    fn from(date: Date) -> Self {
        IsoWeek::of(date)
    }
}

pub struct IsoWeekIter {
    current: IsoWeek,
    end: IsoWeek,
}

impl Iterator for IsoWeekIter {
    type Item = IsoWeek;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current > self.end {
            None
        } else {
            let next = self.current;
            self.current = self.current.next();
            Some(next)
        }
    }
}

/// Monday=0 .. Sunday=6, the ordering the shift-rostering calendar logic
/// (company workweek membership, weekly grouping) keys off of.
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.number_days_from_monday()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn of_extracts_iso_week() {
        let week = IsoWeek::of(date!(2025 - 01 - 06));
        assert_eq!(week, IsoWeek::new(2025, 2));
    }

    #[test]
    fn next_rolls_over_year_boundary() {
        let week = IsoWeek::new(2025, 52);
        assert_eq!(week.next(), IsoWeek::new(2026, 1));
    }

    #[test]
    fn iter_until_is_inclusive() {
        let weeks: Vec<_> = IsoWeek::new(2025, 1).iter_until(IsoWeek::new(2025, 3)).collect();
        assert_eq!(weeks, vec![
            IsoWeek::new(2025, 1),
            IsoWeek::new(2025, 2),
            IsoWeek::new(2025, 3),
        ]);
    }

    #[test]
    fn first_date_is_monday() {
        let week = IsoWeek::new(2025, 2);
        assert_eq!(week.first_date().unwrap().weekday(), Weekday::Monday);
    }

    #[test]
    fn first_date_rejects_a_week_that_does_not_exist_in_its_year() {
        let week = IsoWeek { year: 2025, week: 53 };
        assert!(week.first_date().is_err());
    }

    #[test]
    fn weekday_index_monday_is_zero() {
        assert_eq!(weekday_index(Weekday::Monday), 0);
        assert_eq!(weekday_index(Weekday::Sunday), 6);
    }
}
