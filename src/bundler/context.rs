//! Per-run context passed to every pipeline component.
//!
//! A [`Context`] bundles the output sink, the platform facts and a snapshot of the
//! environment variables and `-D` properties. Components never read process-global
//! state directly, which keeps resolution and gating deterministic under test.

use super::os::OsCapabilities;
use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

/// Log target used for everything the external toolchain prints.
pub const TOOL_LOG_TARGET: &str = "jet";

/// Destination for diagnostic lines produced by the pipeline and by child processes.
pub trait OutputSink: Send + Sync {
    fn info(&self, line: &str);
    fn warn(&self, line: &str);
    fn error(&self, line: &str);
}

/// Sink forwarding to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl OutputSink for LogSink {
    fn info(&self, line: &str) {
        log::info!(target: TOOL_LOG_TARGET, "{line}");
    }

    fn warn(&self, line: &str) {
        log::warn!(target: TOOL_LOG_TARGET, "{line}");
    }

    fn error(&self, line: &str) {
        log::error!(target: TOOL_LOG_TARGET, "{line}");
    }
}

/// Severity of a collected line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Sink that keeps every line in memory.
///
/// Used to capture the compiler banner during edition detection and to assert on
/// diagnostics in tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    lines: Mutex<Vec<(Level, String)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: Level, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, line.to_string()));
        }
    }

    /// All lines collected so far, in arrival order.
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Lines of one severity.
    pub fn lines_at(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line)
            .collect()
    }

    /// True when any collected line of the given severity contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lines_at(level).iter().any(|line| line.contains(needle))
    }
}

impl OutputSink for CollectingSink {
    fn info(&self, line: &str) {
        self.push(Level::Info, line);
    }

    fn warn(&self, line: &str) {
        self.push(Level::Warn, line);
    }

    fn error(&self, line: &str) {
        self.push(Level::Error, line);
    }
}

/// Snapshot of environment variables and `-D key=value` properties.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: Vec<(String, String)>,
    properties: HashMap<String, String>,
}

impl Environment {
    /// Snapshot of the current process environment, no properties.
    pub fn inherit() -> Self {
        Self {
            vars: std::env::vars().collect(),
            properties: HashMap::new(),
        }
    }

    /// Empty environment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set (or replace) a variable.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.vars.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.vars.push((key, value)),
        }
        self
    }

    /// Set a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Variables in insertion order.
    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }

    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }
}

/// Run-scoped context: output sink, platform facts, environment snapshot.
#[derive(Clone)]
pub struct Context {
    sink: Arc<dyn OutputSink>,
    os: OsCapabilities,
    env: Arc<Environment>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("os", &self.os)
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

impl Context {
    pub fn new(sink: Arc<dyn OutputSink>, os: OsCapabilities, env: Environment) -> Self {
        Self {
            sink,
            os,
            env: Arc::new(env),
        }
    }

    /// Context of the running process: log sink, host platform, inherited environment.
    pub fn host() -> Self {
        Self::new(Arc::new(LogSink), OsCapabilities::host(), Environment::inherit())
    }

    /// Same platform and environment, different sink.
    pub fn with_sink(&self, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            sink,
            os: self.os,
            env: Arc::clone(&self.env),
        }
    }

    pub fn sink(&self) -> &Arc<dyn OutputSink> {
        &self.sink
    }

    pub fn os(&self) -> OsCapabilities {
        self.os
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Non-empty value of an environment variable.
    ///
    /// Lookup ignores case on platforms with case-insensitive environments.
    pub fn var(&self, key: &str) -> Option<&str> {
        let case_insensitive = self.os.env_case_insensitive();
        self.env
            .vars()
            .iter()
            .find(|(k, _)| {
                if case_insensitive {
                    k.eq_ignore_ascii_case(key)
                } else {
                    k == key
                }
            })
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    /// Non-empty value of a `-D` property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.env
            .properties()
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Home directory of the current user.
    pub fn home_dir(&self) -> Option<PathBuf> {
        let from_env = if self.os.is_windows() {
            self.var("USERPROFILE")
        } else {
            self.var("HOME")
        };
        from_env.map(PathBuf::from).or_else(dirs::home_dir)
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.sink.warn(message.as_ref());
    }
}
