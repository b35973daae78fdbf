use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use dialogkit_engine::scene::SceneHost;
use dialogkit_engine::{DialogBuilder, DialogConfig, Host, shared};
use dirs_next::config_dir;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod demo;

use demo::DemoDialog;

/// Environment variable overriding the configuration file path.
const CONFIG_PATH_ENV: &str = "DIALOGKIT_CONFIG";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Parser)]
#[command(name = "dialogkit-demo", version, about = "Shows the dialogkit sample dialog in the terminal")]
struct Args {
    /// Dialog configuration file (JSON). Defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write logs; the terminal itself is owned by the UI.
    #[arg(long, default_value_os_t = default_log_path())]
    log_file: PathBuf,
}

fn default_log_path() -> PathBuf {
    env::temp_dir().join("dialogkit-demo.log")
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    config_dir().map(|dir| dir.join("dialogkit").join(CONFIG_FILE_NAME))
}

fn init_tracing(log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("open log file {}", log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// An explicit path must load; the default path is optional.
fn load_config(explicit: Option<&Path>) -> Result<DialogConfig> {
    if let Some(path) = explicit {
        return DialogConfig::load(path).with_context(|| format!("load config {}", path.display()));
    }
    match default_config_path() {
        Some(path) if path.exists() => DialogConfig::load(&path).with_context(|| format!("load config {}", path.display())),
        _ => Ok(DialogConfig::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_file)?;
    let config = load_config(args.config.as_deref())?;
    info!(log_file = %args.log_file.display(), "starting dialogkit demo");

    let (dispatcher, inbox) = dialogkit_tui::channel();
    let host = SceneHost::new();
    let window = DialogBuilder::<DemoDialog>::new()
        .build_window("Test Dialog", host.clone() as Rc<dyn Host>, Rc::new(config), shared(DemoDialog::new(dispatcher)))
        .context("build demo dialog")?;

    dialogkit_tui::run(host, inbox, move |message| demo::apply(&window, message)).await
}
