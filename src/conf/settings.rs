use crate::editor::{CommitPolicy, DEFAULT_CELL_TIMEOUT};
use crate::util::{DefaultTimeline, Timeline, TimelineProvider};
use arc_swap::ArcSwap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub type SettingsRef = Arc<ArcSwap<Settings>>;

#[derive(Clone, Debug)]
pub struct Settings {
    pub settings_location: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub edit_timeout: Duration,
    pub commit_policy: CommitPolicy,
    pub write_settings: bool,
    pub timeline: Timeline,
}

impl Settings {
    pub fn with_timeline<T: TimelineProvider + 'static>(mut self, timeline: T) -> Self {
        self.timeline = Arc::new(timeline);
        self
    }

    pub fn into_ref(self) -> SettingsRef {
        Arc::new(ArcSwap::new(Arc::new(self)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            settings_location: None,
            data_dir: Default::default(),
            edit_timeout: DEFAULT_CELL_TIMEOUT,
            commit_policy: CommitPolicy::default(),
            write_settings: false,
            timeline: Arc::new(DefaultTimeline),
        }
    }
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct SettingsSer {
    pub data_dir: PathBuf,
    pub edit_timeout_secs: u64,
    #[serde(default)]
    pub commit_policy: CommitPolicy,
}

impl SettingsSer {
    pub fn from_settings(settings: &Settings) -> SettingsSer {
        SettingsSer {
            data_dir: settings.data_dir.clone(),
            edit_timeout_secs: settings.edit_timeout.as_secs(),
            commit_policy: settings.commit_policy,
        }
    }
}
