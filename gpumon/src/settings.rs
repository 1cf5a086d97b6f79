//! Settings and persisted state, stored as JSON under the XDG config dir:
//! $XDG_CONFIG_HOME/gpumon/{settings.json,state.json} (fallback ~/.config/gpumon/...)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    cell::RefCell,
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::error::{PanelError, Result};
use crate::host::{ConfigSource, KeyValueStore};
use crate::types::AlertThresholds;

pub const SELECTED_GPU_KEY: &str = "selectedGpu";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub enable_prometheus: bool,
    pub alert_gpu: f64,
    pub alert_vram: f64,
    pub alert_temp: f64,
    /// Interpreter used to run the collector script
    pub python: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let t = AlertThresholds::default();
        Self {
            enable_prometheus: false,
            alert_gpu: t.gpu,
            alert_vram: t.vram,
            alert_temp: t.temp,
            python: "python3".into(),
            script: None,
        }
    }
}

impl Settings {
    pub fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            gpu: self.alert_gpu,
            vram: self.alert_vram,
            temp: self.alert_temp,
        }
    }

    /// Configured script, or `agent/metrics.py` beside the executable, or relative to cwd.
    pub fn script_path(&self) -> PathBuf {
        if let Some(s) = &self.script {
            return s.clone();
        }
        let rel = Path::new("agent").join("metrics.py");
        if let Ok(exe) = std::env::current_exe() {
            if let Some(parent) = exe.parent() {
                let candidate = parent.join(&rel);
                if candidate.exists() {
                    return candidate;
                }
            }
        }
        rel
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("gpumon")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gpumon")
    }
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn state_path() -> PathBuf {
    config_dir().join("state.json")
}

/// A missing file is not an error; a file that does not parse is.
pub fn read_settings(path: &Path) -> std::result::Result<Settings, serde_json::Error> {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s),
        Err(_) => Ok(Settings::default()),
    }
}

pub fn load_settings(path: &Path) -> Settings {
    read_settings(path).unwrap_or_else(|e| {
        warn!("ignoring unreadable settings {}: {e}", path.display());
        Settings::default()
    })
}

/// Command-line values that win over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub python: Option<String>,
    pub script: Option<PathBuf>,
    pub prometheus: bool,
}

impl Overrides {
    pub fn apply(&self, mut s: Settings) -> Settings {
        if let Some(p) = &self.python {
            s.python = p.clone();
        }
        if let Some(p) = &self.script {
            s.script = Some(p.clone());
        }
        if self.prometheus {
            s.enable_prometheus = true;
        }
        s
    }
}

/// Settings file re-read on every access, so edits apply to the next bundle.
/// A parse failure is warned about once per distinct error.
#[derive(Debug, Clone)]
pub struct FileConfig {
    path: PathBuf,
    overrides: Overrides,
    last_error: RefCell<Option<String>>,
}

impl FileConfig {
    pub fn new(path: PathBuf, overrides: Overrides) -> Self {
        Self {
            path,
            overrides,
            last_error: RefCell::new(None),
        }
    }
}

impl ConfigSource for FileConfig {
    fn settings(&self) -> Settings {
        let s = match read_settings(&self.path) {
            Ok(s) => {
                self.last_error.replace(None);
                s
            }
            Err(e) => {
                let msg = e.to_string();
                if self.last_error.borrow().as_deref() == Some(msg.as_str()) {
                    debug!("still ignoring unreadable settings {}: {msg}", self.path.display());
                } else {
                    warn!("ignoring unreadable settings {}: {msg}", self.path.display());
                    self.last_error.replace(Some(msg));
                }
                Settings::default()
            }
        };
        self.overrides.apply(s)
    }
}

/// JSON-object file backing the key-value store. Written whole on every update.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl FileStore {
    /// Opens the store; a missing or corrupt file starts empty.
    pub fn open(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!("ignoring unreadable state {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    fn save(&self) -> Result<()> {
        let io_err = |source| PanelError::StateIo {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(&self.values)?;
        fs::write(&self.path, data).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn update(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.save()
    }
}
