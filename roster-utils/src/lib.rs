//! Date and ISO-week arithmetic shared across the roster core crates.
//!
//! Ported from the teacher's `shifty-utils` date helpers, simplified to work
//! directly against `time::Date` rather than a bespoke entity type since this
//! crate has no database rows to key.

mod iso_week;

pub use iso_week::{weekday_index, IsoWeek, IsoWeekIter, RosterUtilsError};

use time::Date;

/// Iterate every calendar date in `[start, end]` inclusive.
pub fn date_range(start: Date, end: Date) -> impl Iterator<Item = Date> {
    let mut current = Some(start);
    std::iter::from_fn(move || match current {
        Some(d) if d <= end => {
            current = d.next_day();
            Some(d)
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn date_range_is_inclusive_both_ends() {
        let days: Vec<_> = date_range(date!(2025 - 01 - 01), date!(2025 - 01 - 03)).collect();
        assert_eq!(
            days,
            vec![date!(2025 - 01 - 01), date!(2025 - 01 - 02), date!(2025 - 01 - 03)]
        );
    }

    #[test]
    fn date_range_single_day() {
        let days: Vec<_> = date_range(date!(2025 - 01 - 01), date!(2025 - 01 - 01)).collect();
        assert_eq!(days, vec![date!(2025 - 01 - 01)]);
    }
}
