use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::error::{FolioError, Result};
use crate::index::DEFAULT_WRITER_MEMORY;
use crate::queue::DEFAULT_CAPACITY;

const PROJECT_CONFIG: &str = ".folio/folio.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub queue: QueueConfig,
    pub search: SearchConfig,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Empty means the platform data directory.
    pub path: PathBuf,
    pub in_memory: bool,
    pub writer_memory: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            in_memory: false,
            writer_memory: DEFAULT_WRITER_MEMORY,
        }
    }
}

impl IndexConfig {
    pub fn resolved_path(&self) -> PathBuf {
        if !self.path.as_os_str().is_empty() {
            return self.path.clone();
        }
        directories::ProjectDirs::from("", "", "folio").map_or_else(
            || PathBuf::from(".folio/index"),
            |d| d.data_dir().join("index"),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub capacity: usize,
    pub process_synchronously: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            process_synchronously: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project()?;
        let merged = Self::merge(global, project);
        let config = merged.with_env_overrides_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn load_global() -> Result<Option<Self>> {
        let config_dir = directories::ProjectDirs::from("", "", "folio").map_or_else(
            || PathBuf::from("~/.config/folio"),
            |d| d.config_dir().to_path_buf(),
        );

        Self::load_file(&config_dir.join("config.toml"))
    }

    fn load_project() -> Result<Option<Self>> {
        Self::load_file(Path::new(PROJECT_CONFIG))
    }

    fn load_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map(Some)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| FolioError::Config(e.to_string()))
    }

    /// A project file replaces the global one section by section; an unset
    /// project index path or log level falls back to the global value.
    fn merge(global: Option<Self>, project: Option<Self>) -> Self {
        match (global, project) {
            (None, None) => Self::default(),
            (Some(only), None) | (None, Some(only)) => only,
            (Some(global), Some(project)) => Self {
                index: IndexConfig {
                    path: if project.index.path.as_os_str().is_empty() {
                        global.index.path
                    } else {
                        project.index.path
                    },
                    ..project.index
                },
                queue: project.queue,
                search: project.search,
                log_level: project.log_level.or(global.log_level),
            },
        }
    }

    pub fn with_env_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("FOLIO_INDEX_PATH") {
            self.index.path = PathBuf::from(path);
        }
        if let Some(capacity) = lookup("FOLIO_QUEUE_CAPACITY") {
            self.queue.capacity = capacity.trim().parse().map_err(|_| {
                FolioError::Config(format!("FOLIO_QUEUE_CAPACITY is not a number: {capacity}"))
            })?;
        }
        if let Some(level) = lookup("FOLIO_LOG") {
            self.log_level = Some(level);
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue.capacity == 0 {
            return Err(FolioError::InvalidCapacity(0));
        }
        if self.search.default_limit == 0 || self.search.max_limit == 0 {
            return Err(FolioError::Config(
                "search limits must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}
