use std::fmt::Display;

use chrono::{DateTime, Datelike, Local, TimeZone};

// RFC 822 style, as podcast players expect in <pubDate>/<lastBuildDate>
pub fn feed_timestamp<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dt.format("%a, %d %b %Y %H:%M:%S %z").to_string()
}

pub fn current_year() -> i32 {
    Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn timestamp_keeps_offset() {
        let dt = DateTime::parse_from_rfc3339("2016-05-03T10:00:00+02:00").unwrap();
        assert_eq!(feed_timestamp(&dt), "Tue, 03 May 2016 10:00:00 +0200");
        let utc: DateTime<Utc> = dt.with_timezone(&Utc);
        assert_eq!(feed_timestamp(&utc), "Tue, 03 May 2016 08:00:00 +0000");
    }
}
