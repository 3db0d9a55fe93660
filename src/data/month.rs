use crate::data::{Day, WorkSession};
use crate::parsing::duration::DurationMin;
use crate::parsing::time::Time;
use crate::util::Timeline;
use serde::{Deserializer, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Month number, 1 to 12. Keys the year store's JSON map, so it
/// serializes as a string.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Month(u8);

impl Month {
    pub fn new(n: u32) -> Option<Month> {
        if (1..=12).contains(&n) {
            Some(Month(n as u8))
        } else {
            None
        }
    }

    pub fn number(self) -> u32 {
        self.0 as u32
    }

    pub fn all() -> impl Iterator<Item = Month> {
        (1u8..=12).map(Month)
    }

    pub fn name_cz(self) -> &'static str {
        MONTHS_CZ[self.0 as usize - 1]
    }
}

const MONTHS_CZ: [&str; 12] = [
    "Leden",
    "Únor",
    "Březen",
    "Duben",
    "Květen",
    "Červen",
    "Červenec",
    "Srpen",
    "Září",
    "Říjen",
    "Listopad",
    "Prosinec",
];

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(MonthVisitor)
    }
}

struct MonthVisitor;

impl<'de> serde::de::Visitor<'de> for MonthVisitor {
    type Value = Month;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("month number between 1 and 12")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let n = u32::from_str(v).map_err(|_| E::custom(format!("invalid month: {}", v)))?;
        Month::new(n).ok_or_else(|| E::custom(format!("month out of range: {}", v)))
    }
}

pub const NEW_SESSION_MINUTES: u32 = 180;
pub const NEW_SESSION_PLACEHOLDER: &str = "Doplnit!";
const NOON: Time = Time::hm(12, 0);

/// Sessions of a single month, in insertion order. The order is the
/// display order; the same date may appear any number of times.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct MonthSheet {
    sessions: Vec<WorkSession>,
}

impl MonthSheet {
    pub fn push(&mut self, session: WorkSession) {
        self.sessions.push(session);
    }

    pub fn remove(&mut self, index: usize) -> Option<WorkSession> {
        if index < self.sessions.len() {
            Some(self.sessions.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WorkSession> {
        self.sessions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut WorkSession> {
        self.sessions.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkSession> {
        self.sessions.iter()
    }

    pub fn total_hours(&self) -> f64 {
        self.sessions.iter().map(|s| s.duration.hours()).sum()
    }

    pub fn total_wage(&self) -> f64 {
        self.sessions.iter().map(WorkSession::wage).sum()
    }

    /// Builds the session a "new row" request appends to this sheet.
    ///
    /// Follows the last session by one day, but never leaves the
    /// sheet's month: when the next day would fall into the following
    /// month the new session lands on the 1st of this month instead.
    pub fn new_session(&self, month: Month, year: i32, timeline: &Timeline) -> WorkSession {
        if let Some(last) = self.sessions.last() {
            let candidate = last.begin_date + 1;
            let begin_date = if candidate.month() == month.number() && candidate.year() == year {
                candidate
            } else {
                Day::ymd(year, month.number(), 1)
            };
            WorkSession {
                begin_date,
                begin_time: NOON,
                duration: DurationMin::new(NEW_SESSION_MINUTES),
                description: last.description.clone(),
                hourly_wage: last.hourly_wage,
            }
        } else {
            let today = timeline.today();
            let (begin_date, begin_time) =
                if today.month() == month.number() && today.year() == year {
                    (today, timeline.time_now())
                } else {
                    (Day::ymd(year, month.number(), 1), NOON)
                };
            WorkSession {
                begin_date,
                begin_time,
                duration: DurationMin::new(NEW_SESSION_MINUTES),
                description: NEW_SESSION_PLACEHOLDER.to_string(),
                hourly_wage: 0,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::StaticTimeline;

    fn session(date: Day, wage: u32, description: &str) -> WorkSession {
        WorkSession {
            begin_date: date,
            begin_time: Time::hm(9, 0),
            duration: DurationMin::new(120),
            description: description.to_string(),
            hourly_wage: wage,
        }
    }

    #[test]
    fn month_range() {
        assert_eq!(Month::new(0), None);
        assert_eq!(Month::new(13), None);
        assert_eq!(Month::new(5).unwrap().number(), 5);
        assert_eq!(Month::new(1).unwrap().name_cz(), "Leden");
        assert_eq!(Month::new(12).unwrap().name_cz(), "Prosinec");
    }

    #[test]
    fn new_session_follows_last_by_one_day() {
        let timeline: Timeline = StaticTimeline::parse("2022-03-14 10:30").into();
        let mut sheet = MonthSheet::default();
        sheet.push(session(Day::ymd(2022, 3, 10), 150, "support"));

        let next = sheet.new_session(Month::new(3).unwrap(), 2022, &timeline);
        assert_eq!(next.begin_date, Day::ymd(2022, 3, 11));
        assert_eq!(next.begin_time, Time::hm(12, 0));
        assert_eq!(next.duration.minutes(), NEW_SESSION_MINUTES);
        assert_eq!(next.description, "support");
        assert_eq!(next.hourly_wage, 150);
    }

    #[test]
    fn new_session_stays_in_month_at_boundary() {
        let timeline: Timeline = StaticTimeline::parse("2022-03-14 10:30").into();
        let mut sheet = MonthSheet::default();
        sheet.push(session(Day::ymd(2022, 3, 31), 150, "support"));

        let next = sheet.new_session(Month::new(3).unwrap(), 2022, &timeline);
        assert_eq!(next.begin_date, Day::ymd(2022, 3, 1));
        assert_eq!(next.begin_time, Time::hm(12, 0));
    }

    #[test]
    fn new_session_in_empty_current_month_starts_now() {
        let timeline: Timeline = StaticTimeline::parse("2022-03-14 10:30").into();
        let sheet = MonthSheet::default();

        let next = sheet.new_session(Month::new(3).unwrap(), 2022, &timeline);
        assert_eq!(next.begin_date, Day::ymd(2022, 3, 14));
        assert_eq!(next.begin_time, Time::hm(10, 30));
        assert_eq!(next.description, NEW_SESSION_PLACEHOLDER);
        assert_eq!(next.hourly_wage, 0);
    }

    #[test]
    fn new_session_in_empty_other_month_starts_on_first() {
        let timeline: Timeline = StaticTimeline::parse("2022-03-14 10:30").into();
        let sheet = MonthSheet::default();

        let next = sheet.new_session(Month::new(7).unwrap(), 2022, &timeline);
        assert_eq!(next.begin_date, Day::ymd(2022, 7, 1));
        assert_eq!(next.begin_time, Time::hm(12, 0));
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut sheet = MonthSheet::default();
        sheet.push(session(Day::ymd(2022, 3, 10), 0, "x"));
        assert!(sheet.remove(3).is_none());
        assert_eq!(sheet.len(), 1);
        assert!(sheet.remove(0).is_some());
        assert!(sheet.is_empty());
    }

    #[test]
    fn totals() {
        let mut sheet = MonthSheet::default();
        sheet.push(session(Day::ymd(2022, 3, 10), 100, "a"));
        sheet.push(session(Day::ymd(2022, 3, 11), 200, "b"));
        assert_eq!(sheet.total_hours(), 4.0);
        assert_eq!(sheet.total_wage(), 2.0 * 100.0 + 2.0 * 200.0);
    }
}
