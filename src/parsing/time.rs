use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::parsing::parse_result::ParseResult;
use chrono::Timelike;
use regex::{Captures, Regex};
use serde::{Deserializer, Serializer};

/// Time of day with minute resolution.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Time {
    h: u8,
    m: u8,
}

impl Time {
    pub const fn hm(h: u32, m: u32) -> Self {
        debug_assert!(h < 24);
        debug_assert!(m < 60);
        Time {
            h: h as u8,
            m: m as u8,
        }
    }

    pub fn try_hm(h: u32, m: u32) -> Option<Self> {
        if h < 24 && m < 60 {
            Some(Time {
                h: h as u8,
                m: m as u8,
            })
        } else {
            None
        }
    }

    /// Parses an entire input as a time of day. Accepted forms are
    /// 'hh:mm', the compact 'hhmm', and a bare hour.
    pub fn parse(input: &str) -> ParseResult<Time, ()> {
        let input = input.trim();
        if input.is_empty() {
            return ParseResult::None;
        }
        if let Some(c) = TIME_HM.captures(input) {
            convert_hm(&c).into()
        } else if let Some(c) = TIME_SHORT.captures(input) {
            convert_hm(&c).into()
        } else if let Some(c) = TIME_H.captures(input) {
            let h = u32::from_str(c.name("hour").unwrap().as_str()).unwrap();
            Self::try_hm(h, 0).into()
        } else {
            ParseResult::Invalid(())
        }
    }

    pub fn h(&self) -> u32 {
        self.h as u32
    }
    pub fn m(&self) -> u32 {
        self.m as u32
    }
}

fn convert_hm(c: &Captures) -> Option<Time> {
    let h = u32::from_str(c.name("hour").unwrap().as_str()).unwrap();
    let m = u32::from_str(c.name("minute").unwrap().as_str()).unwrap();
    Time::try_hm(h, m)
}

impl serde::Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(TimeVisitor)
    }
}

struct TimeVisitor;
impl<'de> serde::de::Visitor<'de> for TimeVisitor {
    type Value = Time;

    fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Time in format 'hh:mm'")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        if let Some(c) = TIME_HM.captures(v) {
            convert_hm(&c).ok_or_else(|| E::custom(format!("Out of range: {}", v)))
        } else {
            Err(E::custom(format!("invalid time: {}", v)))
        }
    }
}

lazy_static::lazy_static! {
    static ref TIME_HM: Regex = Regex::new(r"^(?P<hour>[0-9]{1,2}):(?P<minute>[0-9]{1,2})$").unwrap();
    static ref TIME_SHORT: Regex = Regex::new(r"^(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})$").unwrap();
    static ref TIME_H: Regex = Regex::new(r"^(?P<hour>[0-9]{1,2})$").unwrap();
}

impl From<Time> for chrono::NaiveTime {
    fn from(t: Time) -> Self {
        chrono::NaiveTime::from_hms(t.h(), t.m(), 0)
    }
}

impl From<chrono::NaiveTime> for Time {
    fn from(n: chrono::NaiveTime) -> Self {
        Time::hm(n.hour(), n.minute())
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.h(), self.m())
    }
}
