use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tracing::{info, warn};

use campaign_runtime::{parse_script, CampaignSetting};
use editor_core::{
    build_editor_app, load_editor_config_from_env, run_frame, shutdown_editor, submit_command,
    EditorConfig, EditorMetrics,
};

mod app;
mod keymap;
mod ui;

use app::EditorHost;

#[derive(Clone)]
struct ChannelWriter {
    sender: Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = String::from_utf8(buf.to_vec()) {
            let _ = self.sender.send(text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Campaign character editor", long_about = None)]
struct Cli {
    /// Campaign file to edit. A missing file starts an empty campaign that is
    /// created on first save.
    campaign: PathBuf,
    /// Editor config file. Defaults to $CHAR_EDITOR_CONFIG_PATH, then the
    /// bundled config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Apply the commands in this file without opening the editor, then save.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Save here instead of over the campaign file.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Scripted runs log to stderr; the interactive editor shows logs in a panel.
    let log_receiver = init_tracing(cli.script.is_none());

    let config = match &cli.config {
        Some(path) => Arc::new(
            EditorConfig::from_file(path)
                .wrap_err_with(|| format!("loading editor config {}", path.display()))?,
        ),
        None => load_editor_config_from_env().0,
    };
    let setting = open_campaign(&cli.campaign)?;
    let save_path = cli.output.clone().unwrap_or_else(|| cli.campaign.clone());
    let mut app = build_editor_app(setting, Arc::clone(&config));

    if let Some(script) = &cli.script {
        run_script(&mut app, script)?;
        let setting = shutdown_editor(app).unwrap_or_default();
        setting
            .save_to_file(&save_path)
            .wrap_err("saving scripted campaign")?;
        info!(
            path = %save_path.display(),
            characters = setting.characters.len(),
            "campaign.saved"
        );
    } else if let Some(log_receiver) = log_receiver {
        let frame_interval = Duration::from_millis(config.frame_interval_ms.max(1));
        let host = EditorHost::new(app, save_path, frame_interval, log_receiver)?;
        shutdown_editor(host.run()?);
    }

    Ok(())
}

fn init_tracing(interactive: bool) -> Option<Receiver<String>> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .with_writer(std::io::stderr)
            .init();
        return None;
    }

    let (log_tx, log_rx) = mpsc::channel::<String>();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_ansi(false)
        .with_writer(move || ChannelWriter {
            sender: log_tx.clone(),
        })
        .init();
    Some(log_rx)
}

fn open_campaign(path: &Path) -> Result<CampaignSetting> {
    if !path.exists() {
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(path = %path.display(), "campaign.new");
        return Ok(CampaignSetting::new(title));
    }
    let setting = CampaignSetting::from_file(path)?;
    info!(
        path = %path.display(),
        characters = setting.characters.len(),
        "campaign.loaded"
    );
    Ok(setting)
}

fn run_script(app: &mut bevy::prelude::App, path: &Path) -> Result<()> {
    let script = fs::read_to_string(path)
        .wrap_err_with(|| format!("reading script {}", path.display()))?;
    let commands = parse_script(&script)?;
    let count = commands.len();
    for command in commands {
        submit_command(app, command);
    }
    run_frame(app);

    let metrics = app.world.resource::<EditorMetrics>();
    if metrics.commands_declined > 0 {
        warn!(
            declined = metrics.commands_declined,
            total = count,
            "script.commands_declined"
        );
    }
    info!(
        applied = metrics.commands_applied,
        total = count,
        "script.applied"
    );
    Ok(())
}
