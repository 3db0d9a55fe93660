use crate::data::{Month, MonthSheet};
use std::collections::BTreeMap;

/// One calendar year of work sessions, grouped by month. Held in
/// memory for the lifetime of the opened file.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct YearStore {
    year: i32,
    months: BTreeMap<Month, MonthSheet>,
}

impl YearStore {
    pub fn new(year: i32) -> YearStore {
        let mut store = YearStore {
            year,
            months: BTreeMap::new(),
        };
        store.fill_missing();
        store
    }

    /// The on-disk format always carries all 12 months; tolerate files
    /// that dropped empty ones.
    pub fn fill_missing(&mut self) {
        for month in Month::all() {
            self.months.entry(month).or_default();
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self, month: Month) -> &MonthSheet {
        &self.months[&month]
    }

    pub fn month_mut(&mut self, month: Month) -> &mut MonthSheet {
        self.months.entry(month).or_default()
    }

    pub fn months(&self) -> impl Iterator<Item = (Month, &MonthSheet)> {
        self.months.iter().map(|(m, sheet)| (*m, sheet))
    }

    pub fn session_count(&self) -> usize {
        self.months.values().map(MonthSheet::len).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::{Day, WorkSession};
    use crate::parsing::duration::DurationMin;
    use crate::parsing::time::Time;

    #[test]
    fn new_store_has_all_months() {
        let store = YearStore::new(2022);
        assert_eq!(store.months().count(), 12);
        assert!(store.months().all(|(_, sheet)| sheet.is_empty()));
    }

    #[test]
    fn rejects_out_of_range_month_key() {
        let result: Result<YearStore, _> =
            serde_json::from_str(r#"{"year": 2022, "months": {"13": []}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn round_trip_preserves_order() {
        let mut store = YearStore::new(2022);
        let march = Month::new(3).unwrap();
        for day in [14, 10, 10, 2] {
            store.month_mut(march).push(WorkSession {
                begin_date: Day::ymd(2022, 3, day),
                begin_time: Time::hm(9, 0),
                duration: DurationMin::new(60),
                description: format!("day {}", day),
                hourly_wage: 0,
            });
        }

        let json = serde_json::to_string_pretty(&store).unwrap();
        let reloaded: YearStore = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, store);

        let days: Vec<u32> = reloaded
            .month(march)
            .iter()
            .map(|s| s.begin_date.day_of_month())
            .collect();
        assert_eq!(days, vec![14, 10, 10, 2]);
    }
}
