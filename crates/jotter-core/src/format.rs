//! Human-readable timestamps for note headers and list cards.

use chrono::{DateTime, Datelike, TimeZone, Timelike};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `Last Edited: January 5, 2024 at 3:07pm`
pub fn format_last_edited<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    let month = MONTHS[at.month0() as usize];
    let (is_pm, hour) = at.hour12();
    let meridiem = if is_pm { "pm" } else { "am" };
    format!(
        "Last Edited: {month} {}, {} at {hour}:{:02}{meridiem}",
        at.day(),
        at.year(),
        at.minute()
    )
}

/// `05 Jan`
pub fn format_card_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    let month = &MONTHS[at.month0() as usize][..3];
    format!("{:02} {month}", at.day())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        rfc3339.parse().unwrap()
    }

    #[test]
    fn last_edited_afternoon() {
        assert_eq!(
            format_last_edited(&at("2024-01-05T15:07:12Z")),
            "Last Edited: January 5, 2024 at 3:07pm"
        );
    }

    #[test]
    fn last_edited_midnight_is_twelve_am() {
        assert_eq!(
            format_last_edited(&at("2023-12-31T00:45:00Z")),
            "Last Edited: December 31, 2023 at 12:45am"
        );
    }

    #[test]
    fn last_edited_noon_is_twelve_pm() {
        assert_eq!(
            format_last_edited(&at("2024-06-01T12:00:00Z")),
            "Last Edited: June 1, 2024 at 12:00pm"
        );
    }

    #[test]
    fn card_date_is_day_and_short_month() {
        assert_eq!(format_card_date(&at("2024-01-05T15:07:12Z")), "05 Jan");
        assert_eq!(format_card_date(&at("2024-09-30T23:59:59Z")), "30 Sep");
    }
}
