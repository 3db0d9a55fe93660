use std::ops::RangeInclusive;
use std::path::PathBuf;

pub use settings::{Settings, SettingsRef, SettingsSer};

mod settings;

/// What the process was asked to do, decided from the command line.
#[derive(Debug)]
pub enum InitialAction {
    /// Print a summary of the opened year.
    Show { file: PathBuf },
    /// Create a fresh year file.
    New { file: PathBuf, year: i32 },
    /// Render months of an opened year to a spreadsheet.
    Export {
        file: PathBuf,
        out: PathBuf,
        months: RangeInclusive<u32>,
    },
}
