//! Entry point for the gpumon dashboard. Parses args, starts the collector and runs the App.

use std::{
    env, fs,
    path::PathBuf,
    sync::Mutex,
};

use anyhow::Context;
use gpumon::app::App;
use gpumon::headless::{forward_stdin, JsonLinesSink};
use gpumon::host::{ChannelSink, ConfigSource, TracingDiagnostics};
use gpumon::panel::Panel;
use gpumon::relay::DisplayRelay;
use gpumon::settings::{config_dir, settings_path, state_path, FileConfig, FileStore, Overrides};
use gpumon::supervisor::{CollectorCommand, Supervisor};
use tokio::sync::{mpsc, oneshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct ParsedArgs {
    overrides: Overrides,
    headless: bool,
    dry_run: bool,
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--script PATH|-s PATH] [--python BIN] [--prometheus] [--headless] [--dry-run] [SCRIPT]"
    )
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "gpumon".into());
    let mut overrides = Overrides::default();
    let mut headless = false; // --headless
    let mut dry_run = false; // --dry-run

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage(&prog)),
            "--script" | "-s" => {
                overrides.script = it.next().map(PathBuf::from);
            }
            "--python" => {
                overrides.python = it.next();
            }
            "--prometheus" => overrides.prometheus = true,
            "--headless" => headless = true,
            "--dry-run" => dry_run = true,
            _ if arg.starts_with("--script=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        overrides.script = Some(PathBuf::from(v));
                    }
                }
            }
            _ if arg.starts_with("--python=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        overrides.python = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown flag '{arg}'. {}", usage(&prog)));
            }
            _ => {
                if overrides.script.is_none() {
                    overrides.script = Some(PathBuf::from(arg));
                } else {
                    return Err(format!("Unexpected argument. {}", usage(&prog)));
                }
            }
        }
    }
    Ok(ParsedArgs {
        overrides,
        headless,
        dry_run,
    })
}

fn log_path() -> PathBuf {
    env::var_os("GPUMON_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join("gpumon.log"))
}

// The dashboard owns the terminal, so TUI mode logs to a file.
fn init_logging(to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !to_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return;
    }
    let path = log_path();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    init_logging(!(parsed.headless || parsed.dry_run));

    let config = FileConfig::new(settings_path(), parsed.overrides.clone());
    let settings = config.settings();
    let cmd = CollectorCommand::from_settings(&settings);

    if parsed.dry_run {
        let t = settings.thresholds();
        println!("collector: {}", cmd.display());
        println!("thresholds: gpu {} vram {} temp {}", t.gpu, t.vram, t.temp);
        println!("settings: {}", settings_path().display());
        println!("state: {}", state_path().display());
        return Ok(());
    }

    let relay = DisplayRelay::new(config, FileStore::open(state_path()));
    let mut sup = Supervisor::start(&cmd).context("collector did not start")?;
    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();

    if parsed.headless {
        let mut panel = Panel::new(relay, JsonLinesSink::new(std::io::stdout()), TracingDiagnostics::default());
        tokio::spawn(forward_stdin(ui_tx));
        tokio::select! {
            _ = panel.run(&mut sup, &mut ui_rx) => {}
            _ = tokio::signal::ctrl_c() => {
                sup.stop().await?;
                // stdin's blocking reader would otherwise hold the runtime open
                std::process::exit(130);
            }
        }
        info!(samples = panel.delivered(), "headless run finished");
        return Ok(());
    }

    let (ev_tx, ev_rx) = mpsc::unbounded_channel();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut panel = Panel::new(relay, ChannelSink::new(ev_tx), TracingDiagnostics::default());
    let core = tokio::spawn(async move {
        tokio::select! {
            _ = panel.run(&mut sup, &mut ui_rx) => {}
            _ = stop_rx => {}
        }
        if let Err(e) = sup.stop().await {
            tracing::warn!("{e}");
        }
        info!(samples = panel.delivered(), "panel closed");
    });

    let mut app = App::new(ev_rx, ui_tx);
    let res = app.run().await;
    let _ = stop_tx.send(());
    let _ = core.await;
    res
}
