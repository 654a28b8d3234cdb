use std::collections::HashSet;

/// German public holidays for 2024, as `(month, day)` pairs, including the
/// Easter-derived moving feasts for that year (Karfreitag, Ostermontag,
/// Christi Himmelfahrt, Pfingstmontag).
pub fn holidays_2024() -> HashSet<(u8, u8)> {
    [
        (1, 1),
        (1, 6),
        (3, 29),
        (4, 1),
        (5, 1),
        (5, 9),
        (5, 20),
        (10, 3),
        (12, 25),
        (12, 26),
    ]
    .into_iter()
    .collect()
}

pub fn holidays_2025() -> HashSet<(u8, u8)> {
    [
        (1, 1),
        (1, 6),
        (4, 18),
        (4, 21),
        (5, 1),
        (5, 29),
        (6, 9),
        (10, 3),
        (12, 25),
        (12, 26),
    ]
    .into_iter()
    .collect()
}

pub fn holidays_2026() -> HashSet<(u8, u8)> {
    [
        (1, 1),
        (1, 6),
        (4, 3),
        (4, 6),
        (5, 1),
        (5, 14),
        (5, 25),
        (10, 3),
        (12, 25),
        (12, 26),
    ]
    .into_iter()
    .collect()
}

/// Fixed-date holidays only (no Easter-derived feasts). Not used as a
/// default for unknown years — a caller must opt in by populating
/// `CompanyPolicy::holiday_table` with this set explicitly.
pub fn fallback_holidays() -> HashSet<(u8, u8)> {
    [
        (1, 1),
        (1, 6),
        (5, 1),
        (10, 3),
        (12, 25),
        (12, 26),
    ]
    .into_iter()
    .collect()
}

/// Returns the built-in table for `year`, if one exists (2024-2026 only).
pub fn builtin_table_for_year(year: i32) -> Option<HashSet<(u8, u8)>> {
    match year {
        2024 => Some(holidays_2024()),
        2025 => Some(holidays_2025()),
        2026 => Some(holidays_2026()),
        _ => None,
    }
}
