//! Logging setup plus macros gated on a per-module `ENABLE_LOGS` flag.
//!
//! A module opts in by declaring the flag and calling the macros through the
//! crate root:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! crate::log_info!("appended {} to {}", row_id, partition);
//! ```

/// Env var that lowers the default filter to `Debug`.
pub const DEBUG_ENV_VAR: &str = "PITCHLOG_DEBUG";

fn debug_requested(value: Option<String>) -> bool {
    value
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Installs `env_logger`, honouring `RUST_LOG`. Safe to call more than once;
/// later calls are ignored.
pub fn init_logging() {
    let level = if debug_requested(std::env::var(DEBUG_ENV_VAR).ok()) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_accepts_one_and_true() {
        assert!(debug_requested(Some("1".into())));
        assert!(debug_requested(Some("TRUE".into())));
        assert!(!debug_requested(Some("0".into())));
        assert!(!debug_requested(None));
    }

    #[test]
    fn init_logging_is_idempotent() {
        init_logging();
        init_logging();
    }
}
