use time::{Date, PrimitiveDateTime};

use roster_model::ShiftTemplate;

/// Portion of `shift` worked on `shift_date` that falls inside
/// `[range_start, range_end]`, accounting for midnight-wrapping shifts.
///
/// Ported verbatim from `kpi_calculator.py::calculate_shift_hours_in_range`:
/// the range's boundary dates are combined with the *shift's own* start/end
/// clock times (not the range's), then clipped against the shift's actual
/// start/end instant.
pub fn shift_hours_in_range(shift: &ShiftTemplate, shift_date: Date, range_start: Date, range_end: Date) -> f64 {
    let dt1 = PrimitiveDateTime::new(shift_date, shift.start_time);
    let mut dt2 = PrimitiveDateTime::new(shift_date, shift.end_time);
    if dt2 < dt1 {
        dt2 += time::Duration::days(1);
    }

    let range_start_dt = PrimitiveDateTime::new(range_start, shift.start_time);
    let range_end_dt = PrimitiveDateTime::new(range_end, shift.end_time);

    let actual_start = dt1.max(range_start_dt);
    let actual_end = dt2.min(range_end_dt);

    let duration_hours = (actual_end - actual_start).whole_seconds() as f64 / 3600.0;
    duration_hours.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn plain_shift() -> ShiftTemplate {
        ShiftTemplate::new(1, "Early", time!(08:00), time!(16:00), 1, 2)
    }

    fn night_shift() -> ShiftTemplate {
        ShiftTemplate::new(2, "Night", time!(22:00), time!(06:00), 1, 2)
    }

    #[test]
    fn full_day_inside_range_yields_full_duration() {
        let shift = plain_shift();
        let hours = shift_hours_in_range(&shift, date!(2025 - 01 - 10), date!(2025 - 01 - 01), date!(2025 - 01 - 31));
        assert_eq!(hours, 8.0);
    }

    #[test]
    fn midnight_wrapping_shift_full_duration() {
        let shift = night_shift();
        let hours = shift_hours_in_range(&shift, date!(2025 - 03 - 01), date!(2025 - 01 - 01), date!(2025 - 12 - 31));
        assert_eq!(hours, 8.0);
    }

    #[test]
    fn shift_entirely_outside_range_is_zero() {
        let shift = plain_shift();
        let hours = shift_hours_in_range(&shift, date!(2025 - 02 - 01), date!(2025 - 01 - 01), date!(2025 - 01 - 31));
        assert_eq!(hours, 0.0);
    }
}
