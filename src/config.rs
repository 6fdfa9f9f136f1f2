use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::models::Project;

pub const CONFIG_FILE: &str = "kata.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub harness: HarnessConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Installed exercises offered in the project list.
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Where exercises and their reports live. Relative paths resolve against the workspace.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_exercises_root")]
    pub exercises_root: PathBuf,
    #[serde(default = "default_reports_root")]
    pub reports_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            exercises_root: default_exercises_root(),
            reports_root: default_reports_root(),
        }
    }
}

impl PathsConfig {
    pub fn resolve(&self, workspace: &Path) -> Self {
        Self {
            exercises_root: workspace.join(&self.exercises_root),
            reports_root: workspace.join(&self.reports_root),
        }
    }

    /// `<reports_root>/<slug>_<language>/test-reports`
    pub fn report_dir(&self, project: &Project) -> PathBuf {
        self.reports_root
            .join(format!("{}_{}", project.slug(), project.language))
            .join("test-reports")
    }
}

fn default_exercises_root() -> PathBuf {
    PathBuf::from("exercises")
}

fn default_reports_root() -> PathBuf {
    PathBuf::from("reports")
}

/// The external command that runs an exercise's integration tests.
#[derive(Debug, Clone, Deserialize)]
pub struct HarnessConfig {
    /// Shell-style command line, e.g. `"make test"` or `"./run-tests.sh --ci"`.
    #[serde(default = "default_harness_command")]
    pub command: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            command: default_harness_command(),
        }
    }
}

fn default_harness_command() -> String {
    "make test".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncConfig {
    /// Results endpoint. Sync is skipped when unset.
    pub endpoint: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Spinner animation interval while a run is in progress.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl UiConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

fn default_tick_ms() -> u64 {
    100
}

impl Config {
    /// Load `kata.toml` from the workspace root, falling back to defaults if absent or invalid.
    pub fn load(workspace: &Path) -> Self {
        let path = workspace.join(CONFIG_FILE);
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        Self::parse(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring invalid config");
            Self::default()
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
