//! Sequential per-cell row editing.
//!
//! One edit request walks a row through its columns: each cell opens,
//! then the walk waits for either a committed value or the per-cell
//! deadline. A timed-out cell cancels the rest of the walk; values
//! already committed stay applied.

use futures::channel::oneshot;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use binding::{
    fallback_value, parse_cell_text, CellValue, Column, CommitOutcome, CommitPolicy, RowBinding,
    FALLBACK_DURATION_MINUTES,
};

mod binding;

pub const DEFAULT_CELL_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EditorState {
    Idle,
    Editing { row: usize, column: Column },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WalkOutcome {
    /// Every column saw a commit within its deadline.
    Finished,
    /// The named column timed out; later columns were never opened.
    Cancelled { column: Column },
    /// Another row is already being edited.
    Busy,
}

/// Commit hook for the currently open cell. The host calls
/// [`CellHandle::commit`] when the user confirms a value; dropping all
/// handles uncommitted lets the deadline cancel the walk.
#[derive(Clone)]
pub struct CellHandle {
    tx: Arc<Mutex<Option<oneshot::Sender<String>>>>,
}

impl CellHandle {
    fn new() -> (CellHandle, oneshot::Receiver<String>) {
        let (tx, rx) = oneshot::channel();
        (
            CellHandle {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// Delivers the edited text. Returns false when the cell already
    /// committed or timed out.
    pub fn commit(&self, text: impl Into<String>) -> bool {
        let sender = self.tx.lock().unwrap().take();
        match sender {
            Some(tx) => tx.send(text.into()).is_ok(),
            None => false,
        }
    }
}

/// Where the grid widget attaches. `cell_opened` must not block: the
/// walk is already waiting on the handle when it is called.
pub trait EditHost: Send + Sync {
    fn cell_opened(&self, row: usize, column: Column, current: String, cell: CellHandle);

    fn walk_ended(&self, _row: usize, _outcome: &WalkOutcome) {}
}

enum CellWait {
    Committed(String),
    Abandoned,
    TimedOut,
}

/// Drives the cell-after-cell walk for one row at a time.
pub struct RowEditor {
    timeout: Duration,
    active: AtomicBool,
    state: Mutex<EditorState>,
}

impl RowEditor {
    pub fn new(timeout: Duration) -> RowEditor {
        RowEditor {
            timeout,
            active: AtomicBool::new(false),
            state: Mutex::new(EditorState::Idle),
        }
    }

    pub fn state(&self) -> EditorState {
        *self.state.lock().unwrap()
    }

    /// Walks the bound row through all columns. Blocks until the walk
    /// ends; callers that must stay responsive run it on a worker
    /// thread.
    pub fn edit_row(&self, binding: &RowBinding, host: &dyn EditHost) -> WalkOutcome {
        if self.active.swap(true, Ordering::SeqCst) {
            log::warn!("Rejecting edit request, another row edit is active");
            return WalkOutcome::Busy;
        }

        let row = binding.row();
        log::info!("Editing row {}", row);

        let mut outcome = WalkOutcome::Finished;
        for column in Column::ALL {
            *self.state.lock().unwrap() = EditorState::Editing { row, column };

            let (handle, rx) = CellHandle::new();
            host.cell_opened(row, column, binding.current_text(column), handle);

            match self.wait_for_commit(rx) {
                CellWait::Committed(text) => {
                    binding.commit(column, &text);
                }
                CellWait::Abandoned | CellWait::TimedOut => {
                    log::warn!("Editing cancelled in column '{}' on row {}", column, row);
                    outcome = WalkOutcome::Cancelled { column };
                    break;
                }
            }
        }

        *self.state.lock().unwrap() = EditorState::Idle;
        self.active.store(false, Ordering::SeqCst);
        host.walk_ended(row, &outcome);
        outcome
    }

    fn wait_for_commit(&self, rx: oneshot::Receiver<String>) -> CellWait {
        let timeout = self.timeout;
        smol::block_on(async move {
            let committed = async {
                match rx.await {
                    Ok(text) => CellWait::Committed(text),
                    Err(oneshot::Canceled) => CellWait::Abandoned,
                }
            };
            let deadline = async {
                smol::Timer::after(timeout).await;
                CellWait::TimedOut
            };
            smol::future::race(committed, deadline).await
        })
    }
}
