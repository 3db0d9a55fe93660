#![allow(dead_code)]
use std::fs::OpenOptions;
use std::io::{BufReader, Write};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::app::{LogNotifier, Workspace};
use crate::conf::{InitialAction, Settings, SettingsSer};
use crate::editor::CommitPolicy;

mod app;
mod cmd;
mod conf;
mod data;
mod db;
mod editor;
mod parsing;
mod util;

fn main() {
    env_logger::init();

    if let Err(e) = main_inner() {
        log::error!("{:?}", e);
        process::exit(-1);
    }
}

fn main_inner() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let args_ref: Vec<&str> = args.iter().map(String::as_str).collect();
    let (settings, args_ref) = parse_settings(&args_ref)?;

    log::debug!("{:?}", settings);
    log::debug!("{:?}", args_ref);

    let initial_action = match args_ref {
        ["new", year, file] => InitialAction::New {
            file: data_file(&settings, file),
            year: i32::from_str(year).context("Cannot parse year")?,
        },
        ["show", file] => InitialAction::Show {
            file: data_file(&settings, file),
        },
        ["export", file, out] => InitialAction::Export {
            file: data_file(&settings, file),
            out: PathBuf::from(out),
            months: 1..=12,
        },
        ["export", file, out, months] => InitialAction::Export {
            file: data_file(&settings, file),
            out: PathBuf::from(out),
            months: parse_month_range(months)?,
        },
        unexpected => bail!(
            "Unexpected arguments: {}. Expected 'new <year> <file>', 'show <file>' \
             or 'export <file> <out> [months]'",
            unexpected.join(" ")
        ),
    };

    let write_back = settings.write_settings;
    let settings_ref = settings.into_ref();
    let mut workspace = Workspace::new(settings_ref.clone(), Arc::new(LogNotifier));

    match initial_action {
        InitialAction::New { file, year } => {
            workspace.new_file(&file, year)?;
        }
        InitialAction::Show { file } => {
            workspace.open_file(&file)?;
            cmd::print_year(&workspace.snapshot());
        }
        InitialAction::Export { file, out, months } => {
            workspace.open_file(&file)?;
            workspace
                .export(&out, months)
                .join()
                .expect("export worker panicked")?;
        }
    }

    if write_back {
        do_write_settings(&settings_ref.load())?;
    }

    Ok(())
}

/// Bare file names live in the configured data directory; anything
/// with a path component is taken as given.
fn data_file(settings: &Settings, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.components().count() > 1 || path.is_absolute() {
        path.to_path_buf()
    } else {
        settings.data_dir.join(path)
    }
}

fn parse_month_range(input: &str) -> anyhow::Result<RangeInclusive<u32>> {
    let range = if let Some((start, end)) = input.split_once('-') {
        let start = u32::from_str(start).context("Cannot parse month range start")?;
        let end = u32::from_str(end).context("Cannot parse month range end")?;
        start..=end
    } else {
        let month = u32::from_str(input).context("Cannot parse month")?;
        month..=month
    };

    if *range.start() < 1 || *range.end() > 12 || range.start() > range.end() {
        bail!("Month range must stay between 1 and 12: {}", input);
    }

    Ok(range)
}

fn do_write_settings(settings: &Settings) -> anyhow::Result<()> {
    let location = settings
        .settings_location
        .as_ref()
        .context("Missing settings location")?;

    log::info!("Writing settings to {}", location.display());

    if let Some(dir) = location.parent() {
        if !dir.is_dir() {
            std::fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create settings directory: {}", dir.display())
            })?;
        }
    }

    let to_write = SettingsSer::from_settings(settings);
    let buffer = serde_json::to_vec_pretty(&to_write).context("Failed to serialize settings")?;
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(location)
        .context("Cannot open settings for writing")?;
    file.write_all(&buffer)
        .context("Failed to write settings")?;

    Ok(())
}

fn parse_settings<'a>(args: &'a [&'a str]) -> anyhow::Result<(Settings, &'a [&'a str])> {
    let mut remaining_args = &args[1..];

    #[derive(Default, Debug)]
    struct SettingsBuilder {
        explicit_config_file: bool,
        config_file: Option<PathBuf>,
        data_dir: Option<PathBuf>,
        timeout_secs: Option<String>,
        commit_policy: Option<String>,
        write_settings: bool,
    }

    let mut b: SettingsBuilder = SettingsBuilder::default();
    loop {
        match remaining_args {
            ["-C" | "--config-file", config_file, rest @ ..] => {
                b.explicit_config_file = true;
                b.config_file = Some(PathBuf::from(config_file));
                remaining_args = rest;
            }
            ["-T" | "--edit-timeout", timeout, rest @ ..] => {
                b.timeout_secs = Some(timeout.to_string());
                remaining_args = rest;
            }
            ["-P" | "--commit-policy", policy, rest @ ..] => {
                b.commit_policy = Some(policy.to_string());
                remaining_args = rest;
            }
            ["-D" | "--data-dir", data_dir, rest @ ..] => {
                b.data_dir = Some(PathBuf::from(data_dir));
                remaining_args = rest;
            }
            ["-W" | "--write-settings", rest @ ..] => {
                b.write_settings = true;
                remaining_args = rest;
            }
            _ => {
                break;
            }
        }
    }

    b.config_file = Some(settings_location(b.config_file)?);

    let from_file = if let Some(ref file) = b.config_file {
        let exists = file.is_file();
        if b.explicit_config_file && !b.write_settings && !exists {
            bail!(
                "Settings file {} does not exist and is not configured to be written",
                file.display()
            );
        }
        if exists {
            let file = std::fs::File::open(file).context("Failed to open settings file")?;
            let reader = BufReader::new(file);
            let explicit: SettingsSer =
                serde_json::from_reader(reader).context("Failed to read settings")?;
            Some(explicit)
        } else {
            None
        }
    } else {
        None
    };

    Ok((
        Settings {
            settings_location: b.config_file,
            data_dir: data_location(b.data_dir, from_file.as_ref())?,
            edit_timeout: edit_timeout(b.timeout_secs, from_file.as_ref())?,
            commit_policy: commit_policy(b.commit_policy, from_file.as_ref())?,
            write_settings: b.write_settings,
            ..Settings::default()
        },
        remaining_args,
    ))
}

const SETTINGS_FILE_NAME: &str = "stint_settings.json";

fn settings_location(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(explicit) = explicit {
        Ok(explicit)
    } else if let Ok(stint_home_env) = std::env::var("STINT_HOME") {
        let stint_home = PathBuf::from(&stint_home_env);
        if stint_home.is_absolute() || stint_home.exists() {
            Ok(stint_home.join(SETTINGS_FILE_NAME))
        } else {
            bail!(
                "Invalid environment value for 'STINT_HOME': '{}'",
                stint_home_env
            );
        }
    } else if let Some(data_dir) = dirs::data_dir() {
        Ok(data_dir.join("stint").join(SETTINGS_FILE_NAME))
    } else {
        bail!("Settings location not defined")
    }
}

fn data_location(
    explicit: Option<PathBuf>,
    loaded: Option<&SettingsSer>,
) -> anyhow::Result<PathBuf> {
    if let Some(explicit) = explicit {
        Ok(explicit)
    } else if let Some(SettingsSer { data_dir, .. }) = loaded {
        Ok(data_dir.to_owned())
    } else if let Ok(stint_home_env) = std::env::var("STINT_HOME") {
        let stint_home = PathBuf::from(&stint_home_env);
        if stint_home.is_absolute() || stint_home.exists() {
            Ok(stint_home.join("timesheets"))
        } else {
            bail!(
                "Invalid environment value for 'STINT_HOME': '{}'",
                stint_home_env
            );
        }
    } else if let Some(data_dir) = dirs::data_dir() {
        Ok(data_dir.join("stint").join("timesheets"))
    } else {
        bail!("Data location not defined")
    }
}

fn edit_timeout(
    explicit: Option<String>,
    loaded: Option<&SettingsSer>,
) -> anyhow::Result<Duration> {
    if let Some(explicit) = explicit {
        let secs = u64::from_str(&explicit).context("Cannot parse edit timeout")?;
        if !(1..=60).contains(&secs) {
            bail!("Edit timeout must be between 1 and 60 seconds: {}", secs);
        }
        Ok(Duration::from_secs(secs))
    } else if let Some(SettingsSer {
        edit_timeout_secs, ..
    }) = loaded
    {
        if !(1..=60).contains(edit_timeout_secs) {
            bail!(
                "Invalid edit_timeout_secs in settings file: {}",
                edit_timeout_secs
            );
        }
        Ok(Duration::from_secs(*edit_timeout_secs))
    } else {
        Ok(crate::editor::DEFAULT_CELL_TIMEOUT)
    }
}

fn commit_policy(
    explicit: Option<String>,
    loaded: Option<&SettingsSer>,
) -> anyhow::Result<CommitPolicy> {
    if let Some(explicit) = explicit {
        match explicit.as_str() {
            "reject" => Ok(CommitPolicy::RejectKeepOld),
            "substitute" => Ok(CommitPolicy::SubstituteDefault),
            other => bail!("Unknown commit policy: {}", other),
        }
    } else if let Some(SettingsSer { commit_policy, .. }) = loaded {
        Ok(*commit_policy)
    } else {
        Ok(CommitPolicy::default())
    }
}
