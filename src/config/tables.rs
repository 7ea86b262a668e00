use super::defaults;
use super::models::{EngineConfig, FinishBehavior, LogLevel};
use serde::Deserialize;

/// On-disk layout of `config.toml`, grouped into tables.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    pagination: PaginationConfig,
    #[serde(default)]
    playback: PlaybackConfig,
    #[serde(default)]
    analysis: AnalysisConfig,
    #[serde(default)]
    preface: PrefaceConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for EngineConfig {
    fn from(tables: ConfigTables) -> Self {
        EngineConfig {
            page_size: tables.pagination.page_size,
            wpm: tables.playback.wpm,
            finish_behavior: tables.playback.finish_behavior,
            max_keywords: tables.analysis.max_keywords,
            max_sentences: tables.analysis.max_sentences,
            start_from_preface: tables.preface.enabled,
            preface_scan_chars: tables.preface.scan_chars,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&EngineConfig> for ConfigTables {
    fn from(config: &EngineConfig) -> Self {
        ConfigTables {
            pagination: PaginationConfig {
                page_size: config.page_size,
            },
            playback: PlaybackConfig {
                wpm: config.wpm,
                finish_behavior: config.finish_behavior,
            },
            analysis: AnalysisConfig {
                max_keywords: config.max_keywords,
                max_sentences: config.max_sentences,
            },
            preface: PrefaceConfig {
                enabled: config.start_from_preface,
                scan_chars: config.preface_scan_chars,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PaginationConfig {
    #[serde(default = "defaults::default_page_size")]
    page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig {
            page_size: defaults::default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PlaybackConfig {
    #[serde(default = "defaults::default_wpm")]
    wpm: u32,
    #[serde(default = "defaults::default_finish_behavior")]
    finish_behavior: FinishBehavior,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            wpm: defaults::default_wpm(),
            finish_behavior: defaults::default_finish_behavior(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct AnalysisConfig {
    #[serde(default = "defaults::default_max_keywords")]
    max_keywords: usize,
    #[serde(default = "defaults::default_max_sentences")]
    max_sentences: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            max_keywords: defaults::default_max_keywords(),
            max_sentences: defaults::default_max_sentences(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PrefaceConfig {
    #[serde(default = "defaults::default_start_from_preface")]
    enabled: bool,
    #[serde(default)]
    scan_chars: Option<usize>,
}

impl Default for PrefaceConfig {
    fn default() -> Self {
        PrefaceConfig {
            enabled: defaults::default_start_from_preface(),
            scan_chars: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
