//! Cross-platform logging.
//!
//! The `log_*!` macros format their arguments and hand them to [`emit`], which
//! forwards to `tracing` on native targets and to the browser console on the web.

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

#[cfg(not(target_arch = "wasm32"))]
pub fn emit(level: Level, msg: &str) {
    match level {
        Level::Debug => tracing::debug!(target: "terno_client", "{}", msg),
        Level::Info => tracing::info!(target: "terno_client", "{}", msg),
        Level::Warn => tracing::warn!(target: "terno_client", "{}", msg),
        Level::Error => tracing::error!(target: "terno_client", "{}", msg),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn emit(level: Level, msg: &str) {
    let value = wasm_bindgen::JsValue::from_str(msg);
    match level {
        Level::Debug => web_sys::console::debug_1(&value),
        Level::Info => web_sys::console::log_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Error => web_sys::console::error_1(&value),
    }
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::Level::Debug, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::Level::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::Level::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::Level::Error, &format!($($arg)*))
    };
}
