//! System log records kept by the backend and browsed from the admin console.
//!
//! Timestamps are the server's local wall-clock time with no offset, which is
//! how the log service writes them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of records returned by one query unless the caller asks
/// for fewer.
pub const DEFAULT_LOG_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log level: {0:?}")]
pub struct UnknownLogLevel(pub String);

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            _ => Err(UnknownLogLevel(s.to_string())),
        }
    }
}

pub type LogData = BTreeMap<String, serde_json::Value>;

/// One stored log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemLog {
    #[serde(rename = "log_id")]
    pub id: String,
    pub timestamp: NaiveDateTime,
    #[serde(rename = "log_level")]
    pub level: LogLevel,
    pub message: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<LogData>,
}

/// A log event to record. The store assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<LogData>,
}

impl LogEntry {
    pub fn new(level: LogLevel, service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            service: service.into(),
            additional_data: None,
        }
    }

    /// Message and service are both required.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.message.trim().is_empty() {
            Some("message")
        } else if self.service.trim().is_empty() {
            Some("service")
        } else {
            None
        }
    }

    pub fn into_log(self, id: String, timestamp: NaiveDateTime) -> SystemLog {
        SystemLog {
            id,
            timestamp,
            level: self.level,
            message: self.message,
            service: self.service,
            additional_data: self.additional_data,
        }
    }
}

/// Query over the system log. Every set field must match; the date bounds
/// are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub level: Option<LogLevel>,
    pub service: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub limit: usize,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            level: None,
            service: None,
            start: None,
            end: None,
            limit: DEFAULT_LOG_LIMIT,
        }
    }
}

impl LogFilter {
    pub fn matches(&self, log: &SystemLog) -> bool {
        self.level.is_none_or(|level| log.level == level)
            && self.service.as_deref().is_none_or(|s| log.service == s)
            && self.start.is_none_or(|start| log.timestamp >= start)
            && self.end.is_none_or(|end| log.timestamp <= end)
    }

    /// Matching records, newest first, cut to `limit`.
    pub fn apply<'a>(&self, logs: impl IntoIterator<Item = &'a SystemLog>) -> Vec<SystemLog> {
        let mut hits: Vec<SystemLog> = logs.into_iter().filter(|l| self.matches(l)).cloned().collect();
        hits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        hits.truncate(self.limit);
        hits
    }
}
