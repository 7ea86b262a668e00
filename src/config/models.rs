use serde::Deserialize;

use crate::keywords::MAX_KEYWORDS_LIMIT;
use crate::pagination::{MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::playback::{MAX_WPM, MIN_WPM};
use crate::summary::MAX_SENTENCES_LIMIT;

/// Engine configuration; deserializable from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
pub struct EngineConfig {
    #[serde(default = "crate::config::defaults::default_page_size")]
    pub page_size: usize,
    #[serde(default = "crate::config::defaults::default_wpm")]
    pub wpm: u32,
    #[serde(default = "crate::config::defaults::default_max_keywords")]
    pub max_keywords: usize,
    #[serde(default = "crate::config::defaults::default_max_sentences")]
    pub max_sentences: usize,
    #[serde(default = "crate::config::defaults::default_start_from_preface")]
    pub start_from_preface: bool,
    /// Number of leading characters searched for the preface anchor. `None`
    /// scans the whole text.
    #[serde(default)]
    pub preface_scan_chars: Option<usize>,
    #[serde(default = "crate::config::defaults::default_finish_behavior")]
    pub finish_behavior: FinishBehavior,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            page_size: crate::config::defaults::default_page_size(),
            wpm: crate::config::defaults::default_wpm(),
            max_keywords: crate::config::defaults::default_max_keywords(),
            max_sentences: crate::config::defaults::default_max_sentences(),
            start_from_preface: crate::config::defaults::default_start_from_preface(),
            preface_scan_chars: None,
            finish_behavior: crate::config::defaults::default_finish_behavior(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Copy of the config with every numeric setting pulled into range.
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        config.page_size = config.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        config.wpm = config.wpm.clamp(MIN_WPM, MAX_WPM);
        config.max_keywords = config.max_keywords.clamp(1, MAX_KEYWORDS_LIMIT);
        config.max_sentences = config.max_sentences.clamp(1, MAX_SENTENCES_LIMIT);
        config
    }
}

/// What `start()` does once playback has reached the last word.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FinishBehavior {
    /// Rewind to the first word and keep playing.
    Restart,
    /// Stay finished until the cursor is moved explicitly.
    Hold,
}

impl Default for FinishBehavior {
    fn default() -> Self {
        FinishBehavior::Restart
    }
}

impl std::fmt::Display for FinishBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FinishBehavior::Restart => "restart",
            FinishBehavior::Hold => "hold",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
