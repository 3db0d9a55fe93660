use crate::data::Day;
use crate::parsing::duration::DurationMin;
use crate::parsing::time::Time;

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct WorkSession {
    pub begin_date: Day,
    pub begin_time: Time,
    pub duration: DurationMin,
    pub description: String,
    #[serde(default)]
    pub hourly_wage: u32,
}

impl WorkSession {
    pub fn wage(&self) -> f64 {
        self.duration.hours() * self.hourly_wage as f64
    }
}
