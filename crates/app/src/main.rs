use anyhow::{bail, Context, Result};
use clap::Parser;
use deezer_overlay_core::{AppConfig, ProfileState};
use deezer_overlay_deezer::{Deezer, HttpSource};
use deezer_overlay_engine::{DiffKind, Poller};
use deezer_overlay_output::OutputWriter;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "deezer-overlay",
    about = "Deezer profile -> now playing files (json, txt, jpg)"
)]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the default config file and exit.
    #[arg(long)]
    init_config: bool,

    /// Refresh rate in seconds. Zero or less polls once and exits.
    #[arg(long = "time", allow_negative_numbers = true)]
    time: Option<i64>,

    /// Deezer profile id.
    #[arg(long)]
    id: Option<u64>,

    /// Base filename for the output files. Empty disables writing.
    #[arg(long = "save-name", alias = "saveName")]
    save_name: Option<String>,

    /// Text file template: %ALBUM_ID% %ALBUM_PICTURE% %ALBUM_TITLE%
    /// %ARTIST_ID% %ARTIST_NAME% %SONG_ID% %SONG_TITLE%, and \n for newlines.
    #[arg(long = "txt-format", alias = "txtFormat")]
    txt_format: Option<String>,

    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg_path = cli.config.clone().unwrap_or_else(default_config_path);

    if cli.init_config {
        init_config(&cfg_path)?;
        println!("Initialized config at {}", cfg_path.display());
        return Ok(());
    }

    let (mut cfg, from_file) = load_config(&cfg_path)?;
    apply_cli_overrides(&mut cfg, cli);
    init_logging(&cfg.log_level);
    if from_file {
        info!(path = %cfg_path.display(), "configuration loaded");
    } else {
        debug!(path = %cfg_path.display(), "no configuration file; using defaults");
    }
    run(cfg).await
}

async fn run(cfg: AppConfig) -> Result<()> {
    let source = HttpSource::new(&cfg.endpoints).context("invalid endpoint configuration")?;
    let mut poller = Poller::new(Deezer::new(cfg.profile_id, source));
    let writer = OutputWriter::from_config(&cfg.output);
    let period = poll_period(cfg.poll_interval_secs);

    info!(
        profile_id = cfg.profile_id,
        interval = ?period,
        output = ?writer.as_ref().map(OutputWriter::json_path),
        "deezer-overlay started"
    );

    if let Some(err) = poller.tick().await.error {
        return Err(err)
            .with_context(|| format!("initial fetch for profile {} failed", cfg.profile_id));
    }
    publish(poller.state(), writer.as_ref());

    let Some(period) = period else {
        return Ok(());
    };
    let mut ticker = interval_at(first_tick(Instant::now(), period)?, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let out = poller.tick().await;
                if let Some(err) = &out.error {
                    warn!(error = %err, transient = err.is_transient(), "fetch failed; waiting for next tick");
                }
                if out.diff == DiffKind::Changed {
                    publish(poller.state(), writer.as_ref());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("received ctrl-c; shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// `None` means a single poll.
fn poll_period(secs: i64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs.unsigned_abs()))
}

fn first_tick(now: Instant, period: Duration) -> Result<Instant> {
    now.checked_add(period)
        .with_context(|| format!("poll interval of {}s is out of range", period.as_secs()))
}

fn publish(state: &ProfileState, writer: Option<&OutputWriter>) {
    match state.now_playing() {
        Some(track) => info!("{} - {}", track.song_title, track.artist_name),
        None => info!("User is not online."),
    }

    if let Some(writer) = writer {
        if let Err(err) = writer.write(state) {
            warn!(error = %format!("{err:#}"), "output update incomplete");
        }
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deezer-overlay")
        .join("config.toml")
}

/// Writes the defaults; an existing file is never overwritten.
fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let body = toml::to_string_pretty(&AppConfig::default())?;
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}

/// Returns the config and whether it came from `path`.
fn load_config(path: &Path) -> Result<(AppConfig, bool)> {
    let (mut cfg, from_file) = match std::fs::read_to_string(path) {
        Ok(data) => {
            let cfg: AppConfig = toml::from_str(&data)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            (cfg, true)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => (AppConfig::default(), false),
        Err(err) => return Err(err).with_context(|| format!("failed to read {}", path.display())),
    };
    apply_env_overrides(&mut cfg);
    Ok((cfg, from_file))
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Ok(v) = std::env::var("DEEZER_OVERLAY_PROFILE_ID") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            cfg.profile_id = parsed;
        }
    }
    if let Ok(v) = std::env::var("DEEZER_OVERLAY_LOG_LEVEL") {
        if !v.trim().is_empty() {
            cfg.log_level = v;
        }
    }
    if let Ok(v) = std::env::var("DEEZER_OVERLAY_SAVE_NAME") {
        cfg.output.save_name = v;
    }
}

fn apply_cli_overrides(cfg: &mut AppConfig, cli: Cli) {
    if let Some(time) = cli.time {
        cfg.poll_interval_secs = time;
    }
    if let Some(id) = cli.id {
        cfg.profile_id = id;
    }
    if let Some(save_name) = cli.save_name {
        cfg.output.save_name = save_name;
    }
    if let Some(txt_format) = cli.txt_format {
        cfg.output.txt_format = txt_format;
    }
    if let Some(level) = cli.log_level {
        cfg.log_level = level;
    }
}
