//! Rolling Logger
//!
//! A `log` backend that forwards every record to the console (the browser
//! console on wasm32, stderr elsewhere) and keeps the most recent lines in
//! a circular buffer so the app can show them in an activity panel.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("logger already initialized")]
    AlreadyInitialized,

    #[error("logger not initialized")]
    NotInitialized,

    #[error(transparent)]
    SetLogger(#[from] log::SetLoggerError),
}

pub struct RollingLogger {
    app_name: String,
    level: LevelFilter,
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl RollingLogger {
    pub fn new(app_name: impl Into<String>, capacity: usize, level: LevelFilter) -> Self {
        let capacity = capacity.max(1);
        Self {
            app_name: app_name.into(),
            level,
            capacity,
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Buffered lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.buffer().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.buffer().clear();
    }

    fn push(&self, line: String) {
        let mut lines = self.buffer();
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    fn buffer(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        // a panic while holding the lock leaves the buffer usable
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), record.target(), &record.args().to_string());
        emit(record.level(), &line);
        self.push(line);
    }

    fn flush(&self) {}
}

fn format_line(level: Level, target: &str, message: &str) -> String {
    format!(
        "[{} {:<5} {}] {}",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        level,
        target,
        message
    )
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

// ========================
// Global logger
// ========================

/// Install the rolling logger as the global `log` backend
pub fn init_logger(app_name: &str, capacity: usize, level: LevelFilter) -> Result<(), LoggerError> {
    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    let logger = LOGGER.get_or_init(|| RollingLogger::new(app_name, capacity, level));
    log::set_logger(logger)?;
    log::set_max_level(level);
    log::info!(target: logger.app_name(), "logger started (level {})", level);
    Ok(())
}

/// Recent lines of the global logger, oldest first
pub fn recent() -> Vec<String> {
    LOGGER.get().map(RollingLogger::lines).unwrap_or_default()
}

pub fn clear() {
    if let Some(logger) = LOGGER.get() {
        logger.clear();
    }
}

pub fn info(message: &str) -> Result<(), LoggerError> {
    let logger = LOGGER.get().ok_or(LoggerError::NotInitialized)?;
    log::info!(target: logger.app_name(), "{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), LoggerError> {
    let logger = LOGGER.get().ok_or(LoggerError::NotInitialized)?;
    log::error!(target: logger.app_name(), "{}", message);
    Ok(())
}
