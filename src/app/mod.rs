//! The application coordinator. Owns what the desktop original kept
//! in process-wide singletons: the loaded year store, the active
//! file, the selected month and the row editor.

use crate::conf::SettingsRef;
use crate::data::{ExportResult, Month, XlsxExporter, YearStore};
use crate::db::{StoreErr, StoreResult, YearFile};
use crate::editor::{EditHost, RowBinding, RowEditor, WalkOutcome};
use crate::util::Timeline;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

pub use notify::{LogNotifier, Notifier};
#[cfg(test)]
pub use notify::RecordingNotifier;

mod notify;

pub struct Workspace {
    settings: SettingsRef,
    store: Arc<Mutex<YearStore>>,
    file: Option<PathBuf>,
    dirty: Arc<AtomicBool>,
    active_month: Month,
    editor: Arc<RowEditor>,
    notifier: Arc<dyn Notifier>,
}

impl Workspace {
    pub fn new(settings: SettingsRef, notifier: Arc<dyn Notifier>) -> Workspace {
        let loaded = settings.load();
        let timeline = loaded.timeline.clone();
        let today = timeline.today();
        let editor = Arc::new(RowEditor::new(loaded.edit_timeout));
        drop(loaded);

        Workspace {
            settings,
            store: Arc::new(Mutex::new(YearStore::new(today.year()))),
            file: None,
            dirty: Arc::new(AtomicBool::new(false)),
            active_month: Month::new(today.month()).expect("chrono month is 1-12"),
            editor,
            notifier,
        }
    }

    fn timeline(&self) -> Timeline {
        self.settings.load().timeline.clone()
    }

    pub fn active_month(&self) -> Month {
        self.active_month
    }

    pub fn select_month(&mut self, month: Month) {
        self.active_month = month;
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Relaxed)
    }

    /// A copy of the in-memory year, for display and export.
    pub fn snapshot(&self) -> YearStore {
        self.store.lock().unwrap().clone()
    }

    pub fn new_file(&mut self, path: &Path, year: i32) -> StoreResult<()> {
        match YearFile::create(path, year) {
            Ok(store) => {
                *self.store.lock().unwrap() = store;
                self.file = Some(path.to_path_buf());
                self.dirty.store(false, Ordering::Relaxed);
                self.notifier.info(&format!("Saved as {}", display_name(path)));
                Ok(())
            }
            Err(StoreErr::InvalidYear(year)) => {
                self.notifier.error(&format!("Invalid year: {}", year));
                Err(StoreErr::InvalidYear(year))
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Cannot save {}", display_name(path)));
                Err(e)
            }
        }
    }

    pub fn open_file(&mut self, path: &Path) -> StoreResult<()> {
        match YearFile::load(path) {
            Ok(store) => {
                *self.store.lock().unwrap() = store;
                self.file = Some(path.to_path_buf());
                self.dirty.store(false, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.notifier.error("File cannot be opened or is not valid");
                Err(e)
            }
        }
    }

    pub fn save(&mut self) -> StoreResult<()> {
        let path = match &self.file {
            Some(path) => path.clone(),
            None => {
                self.notifier.error("No timesheet file is opened");
                return Err(StoreErr::NoActiveFile);
            }
        };
        self.save_to(&path)
    }

    pub fn save_as(&mut self, path: &Path) -> StoreResult<()> {
        self.save_to(path)?;
        self.file = Some(path.to_path_buf());
        Ok(())
    }

    fn save_to(&mut self, path: &Path) -> StoreResult<()> {
        let store = self.store.lock().unwrap();
        match YearFile::save(path, &store) {
            Ok(()) => {
                self.dirty.store(false, Ordering::Relaxed);
                self.notifier.info(&format!("Saved as {}", display_name(path)));
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(&format!("Cannot save {}", display_name(path)));
                Err(e)
            }
        }
    }

    /// Appends the new-row session to the active month and returns its
    /// row index.
    pub fn new_row(&mut self) -> usize {
        let timeline = self.timeline();
        let mut store = self.store.lock().unwrap();
        let year = store.year();
        let sheet = store.month_mut(self.active_month);
        let session = sheet.new_session(self.active_month, year, &timeline);
        sheet.push(session);
        self.dirty.store(true, Ordering::Relaxed);
        sheet.len() - 1
    }

    pub fn delete_row(&mut self, row: usize) -> bool {
        let mut store = self.store.lock().unwrap();
        let removed = store.month_mut(self.active_month).remove(row).is_some();
        if removed {
            self.dirty.store(true, Ordering::Relaxed);
        }
        removed
    }

    pub fn month_hours(&self) -> f64 {
        self.store.lock().unwrap().month(self.active_month).total_hours()
    }

    pub fn month_wage(&self) -> f64 {
        self.store.lock().unwrap().month(self.active_month).total_wage()
    }

    /// Starts the row-edit walk on a worker thread so the caller stays
    /// responsive. Returns `None` when the row does not exist.
    pub fn edit_row(
        &self,
        row: usize,
        host: Arc<dyn EditHost>,
    ) -> Option<JoinHandle<WalkOutcome>> {
        if self.store.lock().unwrap().month(self.active_month).get(row).is_none() {
            log::warn!("No row {} in month {}", row, self.active_month);
            return None;
        }

        let binding = RowBinding::new(
            self.store.clone(),
            self.active_month,
            row,
            self.timeline(),
            self.settings.load().commit_policy,
            self.dirty.clone(),
            self.notifier.clone(),
        );
        let editor = self.editor.clone();
        Some(std::thread::spawn(move || {
            editor.edit_row(&binding, host.as_ref())
        }))
    }

    /// Renders the given months to an XLSX file on a worker thread.
    /// The outcome is reported through the notifier.
    pub fn export(
        &self,
        path: &Path,
        months: RangeInclusive<u32>,
    ) -> JoinHandle<ExportResult<()>> {
        let snapshot = self.snapshot();
        let notifier = self.notifier.clone();
        let path = path.to_path_buf();
        std::thread::spawn(move || {
            let result = XlsxExporter::export(&snapshot, &path, months);
            match &result {
                Ok(()) => notifier.info(&format!("Saved as {}", display_name(&path))),
                Err(e) => {
                    log::error!("Export failed: {}", e);
                    notifier.error(&format!("Cannot save {}", display_name(&path)));
                }
            }
            result
        })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
