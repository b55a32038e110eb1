use std::ops::Index;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Parses a post date. Accepted forms, all in UTC unless an offset is given:
/// `2024-01-15`, `2024-01-15 10:42:32[.123]`, `2024-01-15T10:42:32` and RFC 3339.
pub fn parse_post_date(buf: &str) -> Result<DateTime<Utc>, String> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap();
        static ref DATE_TIME_REGEX: Regex = Regex::new(
            r"^(\d{4})-(\d{2})-(\d{2})[ T](\d{2}):(\d{2}):(\d{2})(\.\d{0,3})?$"
        ).unwrap();
    }

    let buf = buf.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(buf) {
        return Ok(dt.with_timezone(&Utc));
    }

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);

    if let Some(caps) = DATE_REGEX.captures(buf) {
        let date = to_date(to_i32(caps.index(1))?, to_u32(caps.index(2))?, to_u32(caps.index(3))?, buf)?;
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    let Some(caps) = DATE_TIME_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date {}", buf));
    };

    let date = to_date(to_i32(caps.index(1))?, to_u32(caps.index(2))?, to_u32(caps.index(3))?, buf)?;
    let h: u32 = to_u32(caps.index(4))?;
    let mn: u32 = to_u32(caps.index(5))?;
    let s: u32 = to_u32(caps.index(6))?;
    let Some(time) = NaiveTime::from_hms_opt(h, mn, s) else {
        return Err(format!("Invalid time of day in {}", buf));
    };

    Ok(NaiveDateTime::new(date, time).and_utc())
}

fn to_date(y: i32, m: u32, d: u32, buf: &str) -> Result<NaiveDate, String> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| format!("Invalid calendar date {}", buf))
}
