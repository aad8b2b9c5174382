use time::{OffsetDateTime, Weekday};

/// Counts weekdays (Monday through Friday) in the half-open day range
/// `[start.date(), end.date())`. Returns 0 when the end date is on or
/// before the start date. Holidays are not considered.
pub fn business_days_between(start: OffsetDateTime, end: OffsetDateTime) -> u32 {
    let end_date = end.date();
    let mut day = start.date();
    let mut count = 0;

    while day < end_date {
        if !matches!(day.weekday(), Weekday::Saturday | Weekday::Sunday) {
            count += 1;
        }
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }

    count
}
