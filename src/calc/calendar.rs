use chrono::{Datelike, Months, NaiveDate};

/// Number of cells in the decade view.
pub(crate) const DECADE_CELLS: usize = 16;
/// Years shown before the decade start in the decade view.
pub(crate) const DECADE_LEAD: i32 = 2;

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

pub(crate) fn month_short_name(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 12 {
        return 31;
    }
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// First day of the month containing `date`.
pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shifts `date` by whole months, clamping the day to the target month's
/// length. Saturates at the browsable range.
pub(crate) fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let step = Months::new(months.unsigned_abs());
    let shifted = if months < 0 {
        date.checked_sub_months(step)
    } else {
        date.checked_add_months(step)
    };
    match shifted {
        Some(shifted) => clamp_browsable(shifted),
        None if months < 0 => browsable_start(),
        None => last_browsable_day(),
    }
}

pub(crate) fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    add_months(date, years.saturating_mul(12))
}

/// Moves `date` to `year`, keeping month and clamping the day (Feb 29 -> Feb 28).
pub(crate) fn with_year(date: NaiveDate, year: i32) -> NaiveDate {
    add_years(date, year.saturating_sub(date.year()))
}

/// Moves `date` to `month` of the same year, clamping the day.
pub(crate) fn with_month(date: NaiveDate, month: u32) -> NaiveDate {
    add_months(date, month as i32 - date.month() as i32)
}

/// First month the calendar browses to. Leaves room for the two lead years
/// of a decade page and the previous month's padding.
pub(crate) fn browsable_start() -> NaiveDate {
    let year = decade_start(NaiveDate::MIN.year() + DECADE_LEAD + 1 + 9);
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Last month the calendar browses to. Its decade page, trailing years
/// included, and the next month's padding stay representable.
pub(crate) fn browsable_end() -> NaiveDate {
    let trailing = DECADE_CELLS as i32 - DECADE_LEAD;
    let year = decade_start(NaiveDate::MAX.year() - trailing) + 9;
    NaiveDate::from_ymd_opt(year, 12, 1).unwrap_or(NaiveDate::MAX)
}

pub(crate) fn is_browsable(date: NaiveDate) -> bool {
    (browsable_start()..=last_browsable_day()).contains(&date)
}

fn last_browsable_day() -> NaiveDate {
    let end = browsable_end();
    end.with_day(31).unwrap_or(end)
}

/// Pulls `date` into the browsable range.
pub(crate) fn clamp_browsable(date: NaiveDate) -> NaiveDate {
    date.clamp(browsable_start(), last_browsable_day())
}

/// First year of the decade containing `year`, floored for negative years.
pub(crate) fn decade_start(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Sunday-based column (0..=6) of the first day of the month.
pub(crate) fn first_weekday_offset(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_name_known_values() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(6), "June");
        assert_eq!(month_name(12), "December");
    }

    #[test]
    fn test_month_name_unknown() {
        assert_eq!(month_name(0), "Unknown");
        assert_eq!(month_name(13), "Unknown");
    }

    #[test]
    fn test_month_short_name() {
        assert_eq!(month_short_name(1), "Jan");
        assert_eq!(month_short_name(9), "Sep");
        assert_eq!(month_short_name(13), "???");
    }

    #[test]
    fn test_days_in_month_february_non_leap() {
        assert_eq!(days_in_month(2025, 2), 28);
    }

    #[test]
    fn test_days_in_month_february_leap() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
    }

    #[test]
    fn test_days_in_month_december() {
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn test_days_in_month_april() {
        assert_eq!(days_in_month(2025, 4), 30);
    }

    #[test]
    fn test_add_months_across_year() {
        assert_eq!(add_months(d(2025, 12, 1), 1), d(2026, 1, 1));
        assert_eq!(add_months(d(2025, 1, 1), -1), d(2024, 12, 1));
    }

    #[test]
    fn test_add_months_clamps_month_end() {
        assert_eq!(add_months(d(2025, 1, 31), 1), d(2025, 2, 28));
        assert_eq!(add_months(d(2024, 3, 31), -1), d(2024, 2, 29));
    }

    #[test]
    fn test_add_years_leap_day() {
        assert_eq!(add_years(d(2024, 2, 29), 1), d(2025, 2, 28));
        assert_eq!(add_years(d(2024, 2, 29), -10), d(2014, 2, 28));
    }

    #[test]
    fn test_with_year_and_month() {
        assert_eq!(with_year(d(2026, 7, 1), 2019), d(2019, 7, 1));
        assert_eq!(with_month(d(2026, 7, 1), 2), d(2026, 2, 1));
        assert_eq!(with_month(d(2026, 7, 31), 2), d(2026, 2, 28));
    }

    #[test]
    fn test_decade_start_positive_and_negative() {
        assert_eq!(decade_start(2026), 2020);
        assert_eq!(decade_start(2020), 2020);
        assert_eq!(decade_start(2029), 2020);
        assert_eq!(decade_start(-1), -10);
    }

    #[test]
    fn test_first_weekday_offset() {
        // 2026-02-01 is a Sunday, 2026-10-01 is a Thursday
        assert_eq!(first_weekday_offset(2026, 2), 0);
        assert_eq!(first_weekday_offset(2026, 10), 4);
    }

    #[test]
    fn test_days_in_month_at_chrono_limits() {
        assert_eq!(days_in_month(NaiveDate::MAX.year(), 12), 31);
        assert_eq!(days_in_month(NaiveDate::MIN.year(), 1), 31);
        assert_eq!(days_in_month(NaiveDate::MAX.year(), 11), 30);
    }

    #[test]
    fn test_browsable_range_leaves_room_for_padding() {
        let start = browsable_start();
        let end = browsable_end();
        assert_eq!((start.month(), start.day()), (1, 1));
        assert_eq!((end.month(), end.day()), (12, 1));
        assert_eq!(decade_start(start.year()), start.year());
        assert_eq!(end.year() % 10, 9);
        assert!(start.year() - DECADE_LEAD > NaiveDate::MIN.year());
        let last_decade_year = decade_start(end.year()) - DECADE_LEAD + DECADE_CELLS as i32 - 1;
        assert!(last_decade_year < NaiveDate::MAX.year());
        assert!(is_browsable(d(2026, 10, 17)));
        assert!(!is_browsable(NaiveDate::MAX));
        assert!(!is_browsable(NaiveDate::MIN));
    }

    #[test]
    fn test_add_months_saturates_at_browsable_range() {
        let end = browsable_end();
        assert_eq!(add_months(end, 1), end.with_day(31).unwrap());
        assert_eq!(add_months(end, 1200), end.with_day(31).unwrap());
        assert_eq!(add_months(NaiveDate::MAX, 1), end.with_day(31).unwrap());
        assert_eq!(add_months(browsable_start(), -1), browsable_start());
        assert_eq!(add_months(NaiveDate::MIN, -1), browsable_start());
        assert_eq!(with_year(d(2026, 7, 1), NaiveDate::MAX.year()).year(), end.year());
    }

    #[test]
    fn test_first_of_month() {
        assert_eq!(first_of_month(d(2026, 10, 17)), d(2026, 10, 1));
    }
}
