use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

/// `log` backend that writes to the browser console of whichever context
/// (window or worker) it is installed in.
pub struct ConsoleLogger {
    scope: &'static str,
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(scope: &'static str, level: LevelFilter) -> Self {
        Self { scope, level }
    }

    fn line(&self, record: &Record) -> String {
        format!("[{}] {}: {}", self.scope, record.target(), record.args())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = JsValue::from_str(&self.line(record));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger. Safe to call more than once; only the first
/// call takes effect.
pub fn init(scope: &'static str, level: LevelFilter) {
    if log::set_boxed_logger(Box::new(ConsoleLogger::new(scope, level))).is_ok() {
        log::set_max_level(level);
    }
}
