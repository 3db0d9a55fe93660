use crate::parsing::parse_result::ParseResult;
use chrono::Datelike;
use regex::Regex;
use serde::{Deserializer, Serializer};
use std::fmt::{Display, Formatter};
use std::ops::{Add, Sub};
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Day {
    date: chrono::NaiveDate,
}

impl Day {
    pub fn ymd(year: i32, month: u32, day: u32) -> Day {
        Day {
            date: chrono::NaiveDate::from_ymd(year, month, day),
        }
    }

    pub fn try_ymd(year: i32, month: u32, day: u32) -> Option<Day> {
        chrono::NaiveDate::from_ymd_opt(year, month, day).map(|date| Day { date })
    }

    pub fn parse(input: &str) -> Result<Day, String> {
        parse_day(input)
    }

    /// Grid input accepts the ISO form and 'd. m. yyyy'.
    pub fn parse_cell(input: &str) -> ParseResult<Day, ()> {
        let input = input.trim();
        if input.is_empty() {
            return ParseResult::None;
        }
        if let Some(c) = DAY_DMY.captures(input) {
            let day = u32::from_str(c.name("day").unwrap().as_str()).unwrap();
            let month = u32::from_str(c.name("month").unwrap().as_str()).unwrap();
            let year = i32::from_str(c.name("year").unwrap().as_str()).unwrap();
            return Day::try_ymd(year, month, day).into();
        }
        parse_day(input).map_err(|_| ()).into()
    }

    pub fn year(self) -> i32 {
        self.date.year()
    }

    pub fn month(self) -> u32 {
        self.date.month()
    }

    pub fn day_of_month(self) -> u32 {
        self.date.day()
    }

    pub fn with_day(self, day: u32) -> Option<Day> {
        self.date.with_day(day).map(|date| Day { date })
    }
}

fn parse_day(input: &str) -> Result<Day, String> {
    if let Some((year, month_day)) = input.split_once('-') {
        if let Some((month, day)) = month_day.split_once('-') {
            return match (
                i32::from_str(year),
                u32::from_str(month),
                u32::from_str(day),
            ) {
                (Ok(year), Ok(month), Ok(day)) => {
                    let date = chrono::NaiveDate::from_ymd_opt(year, month, day)
                        .ok_or_else(|| "bad date".to_string())?;
                    Ok(Day { date })
                }
                _ => Err("invalid date".to_string()),
            };
        }
    }

    Err(format!("Invalid date: {}", input))
}

lazy_static::lazy_static! {
    static ref DAY_DMY: Regex =
        Regex::new(r"^(?P<day>[0-9]{1,2})\.\s*(?P<month>[0-9]{1,2})\.\s*(?P<year>[0-9]{4})$").unwrap();
}

impl Display for Day {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.date.year(),
            self.date.month(),
            self.date.day()
        )
    }
}

impl From<chrono::NaiveDate> for Day {
    fn from(date: chrono::NaiveDate) -> Self {
        Day { date }
    }
}

impl From<Day> for chrono::NaiveDate {
    fn from(d: Day) -> Self {
        d.date
    }
}

impl serde::Serialize for Day {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl Add<i64> for Day {
    type Output = Self;
    fn add(self, rhs: i64) -> Self::Output {
        Day {
            date: self.date.add(chrono::Duration::days(rhs)),
        }
    }
}

impl Sub<i64> for Day {
    type Output = Self;
    fn sub(self, rhs: i64) -> Self::Output {
        self + (-rhs)
    }
}

impl<'de> serde::Deserialize<'de> for Day {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(DayVisitor)
    }
}

struct DayVisitor;

impl<'de> serde::de::Visitor<'de> for DayVisitor {
    type Value = Day;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("ISO date in the format YYYY-MM-DD")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        parse_day(v).map_err(E::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn day_serde_json() {
        let day = Day::ymd(2021, 11, 28);
        let as_str = serde_json::to_string(&day).unwrap();
        assert_eq!(as_str, "\"2021-11-28\"");
        let from_str: Day = serde_json::from_str(&as_str).unwrap();
        assert_eq!(from_str, day);
    }

    #[test]
    fn add_days_crosses_month() {
        let day = Day::ymd(2022, 1, 31);
        assert_eq!(day + 1, Day::ymd(2022, 2, 1));
        assert_eq!(Day::ymd(2022, 1, 1) - 1, Day::ymd(2021, 12, 31));
    }

    #[test]
    fn parse_cell_forms() {
        assert_eq!(
            Day::parse_cell("2022-03-05"),
            ParseResult::Valid(Day::ymd(2022, 3, 5))
        );
        assert_eq!(
            Day::parse_cell("5. 3. 2022"),
            ParseResult::Valid(Day::ymd(2022, 3, 5))
        );
        assert_eq!(
            Day::parse_cell("05.3.2022"),
            ParseResult::Valid(Day::ymd(2022, 3, 5))
        );
        assert_eq!(Day::parse_cell("2022-02-30"), ParseResult::Invalid(()));
        assert_eq!(Day::parse_cell("yesterday"), ParseResult::Invalid(()));
        assert_eq!(Day::parse_cell(""), ParseResult::None);
    }
}
