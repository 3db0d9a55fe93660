use crate::app::Notifier;
use crate::data::{Day, Month, WorkSession, YearStore};
use crate::parsing::duration::DurationMin;
use crate::parsing::parse_result::ParseResult;
use crate::parsing::time::Time;
use crate::util::Timeline;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Grid columns in their edit-walk order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Column {
    Date,
    Begin,
    Duration,
    Description,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Date,
        Column::Begin,
        Column::Duration,
        Column::Description,
    ];

    pub fn next(self) -> Option<Column> {
        match self {
            Column::Date => Some(Column::Begin),
            Column::Begin => Some(Column::Duration),
            Column::Duration => Some(Column::Description),
            Column::Description => None,
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Column::Date => "date",
            Column::Begin => "begin",
            Column::Duration => "duration",
            Column::Description => "description",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Date(Day),
    Begin(Time),
    Duration(DurationMin),
    Description(String),
}

/// What a commit with unparseable input does to the cell.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Keep the previous value and report the error.
    #[default]
    RejectKeepOld,
    /// Overwrite with the column's fallback value and report the
    /// error. This is what the desktop original did.
    SubstituteDefault,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CommitOutcome {
    Applied,
    Substituted,
    Rejected,
}

pub const FALLBACK_DURATION_MINUTES: u32 = 30;

/// Parses cell text for one column. Empty input is [`ParseResult::None`],
/// which the commit path treats like a failed parse.
pub fn parse_cell_text(column: Column, text: &str) -> ParseResult<CellValue, ()> {
    match column {
        Column::Date => Day::parse_cell(text).map(CellValue::Date),
        Column::Begin => Time::parse(text).map(CellValue::Begin),
        Column::Duration => DurationMin::parse(text).map(CellValue::Duration),
        Column::Description => ParseResult::Valid(CellValue::Description(text.to_string())),
    }
}

/// The value substituted under [`CommitPolicy::SubstituteDefault`].
pub fn fallback_value(column: Column, timeline: &Timeline) -> CellValue {
    match column {
        Column::Date => CellValue::Date(timeline.today()),
        Column::Begin => CellValue::Begin(timeline.time_now()),
        Column::Duration => CellValue::Duration(DurationMin::new(FALLBACK_DURATION_MINUTES)),
        Column::Description => CellValue::Description(String::new()),
    }
}

fn parse_error_message(column: Column, text: &str) -> String {
    match column {
        Column::Date => format!("'{}' is not a valid date", text),
        Column::Begin => format!("'{}' is not a valid time", text),
        Column::Duration => format!("'{}' is not a valid number of minutes", text),
        Column::Description => unreachable!("description accepts any text"),
    }
}

/// Binds one row of a month sheet to the cell converters. This is the
/// seam a grid widget would sit on: it renders cell text and applies
/// committed edits back into the store.
pub struct RowBinding {
    store: Arc<Mutex<YearStore>>,
    month: Month,
    row: usize,
    timeline: Timeline,
    policy: CommitPolicy,
    dirty: Arc<AtomicBool>,
    notifier: Arc<dyn Notifier>,
}

impl RowBinding {
    pub fn new(
        store: Arc<Mutex<YearStore>>,
        month: Month,
        row: usize,
        timeline: Timeline,
        policy: CommitPolicy,
        dirty: Arc<AtomicBool>,
        notifier: Arc<dyn Notifier>,
    ) -> RowBinding {
        RowBinding {
            store,
            month,
            row,
            timeline,
            policy,
            dirty,
            notifier,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    /// The text shown in the cell editor when it opens.
    pub fn current_text(&self, column: Column) -> String {
        let store = self.store.lock().unwrap();
        match store.month(self.month).get(self.row) {
            Some(session) => match column {
                Column::Date => session.begin_date.to_string(),
                Column::Begin => session.begin_time.to_string(),
                Column::Duration => session.duration.minutes().to_string(),
                Column::Description => session.description.clone(),
            },
            None => String::new(),
        }
    }

    /// Applies a committed cell text. A failed parse follows the
    /// configured [`CommitPolicy`]; either way the caller advances to
    /// the next column.
    pub fn commit(&self, column: Column, text: &str) -> CommitOutcome {
        let parsed = parse_cell_text(column, text);
        let (value, outcome) = if parsed.is_valid() {
            (parsed.get().unwrap(), CommitOutcome::Applied)
        } else {
            self.notifier.error(&parse_error_message(column, text));
            match self.policy {
                CommitPolicy::RejectKeepOld => return CommitOutcome::Rejected,
                CommitPolicy::SubstituteDefault => (
                    fallback_value(column, &self.timeline),
                    CommitOutcome::Substituted,
                ),
            }
        };

        let mut store = self.store.lock().unwrap();
        let session = match store.month_mut(self.month).get_mut(self.row) {
            Some(session) => session,
            None => {
                log::warn!("Row {} vanished before the edit was applied", self.row);
                return CommitOutcome::Rejected;
            }
        };
        apply_value(session, value);
        self.dirty.store(true, Ordering::Relaxed);
        outcome
    }
}

fn apply_value(session: &mut WorkSession, value: CellValue) {
    match value {
        CellValue::Date(day) => session.begin_date = day,
        CellValue::Begin(time) => session.begin_time = time,
        CellValue::Duration(minutes) => session.duration = minutes,
        CellValue::Description(text) => session.description = text,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::StaticTimeline;

    #[test]
    fn fallback_values_follow_the_clock() {
        let clock = Arc::new(StaticTimeline::parse("2022-03-14 10:30"));
        let timeline: Timeline = clock.clone();

        assert_eq!(
            fallback_value(Column::Begin, &timeline),
            CellValue::Begin(Time::hm(10, 30))
        );
        clock.advance();
        assert_eq!(
            fallback_value(Column::Begin, &timeline),
            CellValue::Begin(Time::hm(10, 31))
        );
        assert_eq!(
            fallback_value(Column::Date, &timeline),
            CellValue::Date(Day::ymd(2022, 3, 14))
        );
        assert_eq!(
            fallback_value(Column::Duration, &timeline),
            CellValue::Duration(DurationMin::new(FALLBACK_DURATION_MINUTES))
        );
    }

    #[test]
    fn column_walk_order() {
        assert_eq!(Column::Date.next(), Some(Column::Begin));
        assert_eq!(Column::Begin.next(), Some(Column::Duration));
        assert_eq!(Column::Duration.next(), Some(Column::Description));
        assert_eq!(Column::Description.next(), None);
    }

    #[test]
    fn parse_cell_text_per_column() {
        assert_eq!(
            parse_cell_text(Column::Begin, "0815"),
            ParseResult::Valid(CellValue::Begin(Time::hm(8, 15)))
        );
        assert_eq!(
            parse_cell_text(Column::Duration, "45"),
            ParseResult::Valid(CellValue::Duration(DurationMin::new(45)))
        );
        assert_eq!(parse_cell_text(Column::Duration, "abc"), ParseResult::Invalid(()));
        assert_eq!(
            parse_cell_text(Column::Description, ""),
            ParseResult::Valid(CellValue::Description(String::new()))
        );
    }
}
