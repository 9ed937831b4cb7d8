//! Contribution-calendar shaping: week buckets, intensity levels, month
//! labels over the week columns.

use serde::Serialize;
use time::macros::format_description;
use time::{Date, Duration, Month};

/// Minimum week columns between two month labels, to prevent overlaps.
pub const MIN_WEEKS_BETWEEN_LABELS: i64 = 4;

/// The chart covers the trailing year; the label pass anchors on this.
pub const LABEL_PERIOD_DAYS: i64 = 366;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub date: String,
    pub count: u32,
    /// Intensity bucket 0-4 used for cell shading.
    pub level: u8,
    pub tooltip: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthLabel {
    pub name: String,
    pub week_index: i64,
}

/// Maps a daily count onto the 0-4 shading scale.
pub fn contribution_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=3 => 1,
        4..=6 => 2,
        7..=9 => 3,
        _ => 4,
    }
}

fn ordinal_suffix(day: u8) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// `"3 contributions on June 3rd"`, falling back to the raw date string
/// when it does not parse.
pub fn tooltip_for(date_str: &str, count: u32) -> String {
    let count_str = if count == 1 {
        format!("{} contribution", count)
    } else {
        format!("{} contributions", count)
    };

    let format = format_description!("[year]-[month]-[day]");
    match Date::parse(date_str, &format) {
        Ok(date) => {
            let day = date.day();
            format!(
                "{} on {} {}{}",
                count_str,
                date.month(),
                day,
                ordinal_suffix(day)
            )
        }
        Err(_) => format!("{} on {}", count_str, date_str),
    }
}

/// The chart grid starts on a Sunday: back up to the previous Sunday
/// (no-op when `reference` already is one).
pub fn chart_start(reference: Date) -> Date {
    let back = reference.weekday().number_days_from_sunday() as i64;
    reference - Duration::days(back)
}

fn first_of_next_month(date: Date) -> Date {
    if date.month() == Month::December {
        Date::from_calendar_date(date.year() + 1, Month::January, 1).unwrap()
    } else {
        Date::from_calendar_date(date.year(), date.month().next(), 1).unwrap()
    }
}

/// Generates the month labels over the visible week columns, dropping any
/// label closer than [`MIN_WEEKS_BETWEEN_LABELS`] to its predecessor.
pub fn month_labels(today: Date) -> Vec<MonthLabel> {
    let start = chart_start(today - Duration::days(LABEL_PERIOD_DAYS));

    let mut month = start.replace_day(1).unwrap();
    let end_month = today.replace_day(1).unwrap();

    let mut labels = Vec::new();
    while month <= end_month {
        let days_offset = (month - start).whole_days();
        labels.push((month.month(), days_offset.div_euclid(7)));
        month = first_of_next_month(month);
    }

    let mut filtered = Vec::new();
    let mut last_week = -MIN_WEEKS_BETWEEN_LABELS;
    for (month, week_index) in labels {
        if week_index - last_week >= MIN_WEEKS_BETWEEN_LABELS {
            filtered.push(MonthLabel {
                name: month.to_string()[..3].to_string(),
                week_index,
            });
            last_week = week_index;
        }
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_contribution_level_buckets() {
        assert_eq!(contribution_level(0), 0);
        assert_eq!(contribution_level(1), 1);
        assert_eq!(contribution_level(3), 1);
        assert_eq!(contribution_level(4), 2);
        assert_eq!(contribution_level(6), 2);
        assert_eq!(contribution_level(7), 3);
        assert_eq!(contribution_level(9), 3);
        assert_eq!(contribution_level(10), 4);
        assert_eq!(contribution_level(250), 4);
    }

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(31), "st");
    }

    #[test]
    fn test_tooltip_formatting() {
        assert_eq!(tooltip_for("2026-06-03", 3), "3 contributions on June 3rd");
        assert_eq!(tooltip_for("2026-06-01", 1), "1 contribution on June 1st");
        assert_eq!(tooltip_for("2026-01-12", 0), "0 contributions on January 12th");
        assert_eq!(tooltip_for("not-a-date", 2), "2 contributions on not-a-date");
    }

    #[test]
    fn test_chart_start_aligns_to_sunday() {
        // 2026-08-02 is a Sunday.
        assert_eq!(chart_start(date!(2026 - 08 - 02)), date!(2026 - 08 - 02));
        assert_eq!(chart_start(date!(2026 - 08 - 04)), date!(2026 - 08 - 02));
        assert_eq!(chart_start(date!(2026 - 08 - 08)), date!(2026 - 08 - 02));
    }

    #[test]
    fn test_month_labels_spacing_and_order() {
        let labels = month_labels(date!(2026 - 08 - 04));
        assert!(!labels.is_empty());

        let mut last = -MIN_WEEKS_BETWEEN_LABELS;
        for label in &labels {
            assert!(label.week_index >= 0);
            assert!(label.week_index - last >= MIN_WEEKS_BETWEEN_LABELS);
            assert_eq!(label.name.len(), 3);
            last = label.week_index;
        }

        // A trailing-year chart is 53-54 columns wide.
        assert!(labels.last().unwrap().week_index <= 54);
    }

    #[test]
    fn test_month_labels_cover_the_year() {
        let labels = month_labels(date!(2026 - 08 - 04));
        // 12-13 month boundaries, minus whichever the overlap filter drops.
        assert!(labels.len() >= 10);
        assert!(labels.len() <= 13);
    }
}
