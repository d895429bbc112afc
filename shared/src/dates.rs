use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// `YYYY-MM-DD` to `DD/MM/YYYY`. Anything else comes back unchanged.
pub fn format_date(date: &str) -> String {
    if date.len() != 10 {
        return date.to_string();
    }

    match date.split('-').collect::<Vec<_>>().as_slice() {
        [year, month, day] => format!("{}/{}/{}", day, month, year),
        _ => date.to_string(),
    }
}

pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// True when `date` is strictly before `today`. Unparseable input is not
/// considered past; the format check reports it instead.
pub fn is_past_date(date: &str, today: NaiveDate) -> bool {
    parse_date(date).map_or(false, |date| date < today)
}

/// Today's calendar date in the local timezone.
pub fn current_date() -> NaiveDate {
    Local::now().date_naive()
}

pub fn current_date_string() -> String {
    current_date().format(DATE_FORMAT).to_string()
}

pub fn combine_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = parse_date(date)?;
    let time = NaiveTime::parse_from_str(time, TIME_FORMAT).ok()?;
    Some(date.and_time(time))
}
