use crate::pagination::DEFAULT_PAGE_SIZE;

pub(crate) fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

pub(crate) fn default_wpm() -> u32 {
    300
}

pub(crate) fn default_max_keywords() -> usize {
    12
}

pub(crate) fn default_max_sentences() -> usize {
    7
}

pub(crate) fn default_start_from_preface() -> bool {
    true
}

pub(crate) fn default_finish_behavior() -> crate::config::FinishBehavior {
    crate::config::FinishBehavior::Restart
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}
