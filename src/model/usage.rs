use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// epoch value meaning "not known yet"
pub const UNKNOWN_TIME: i64 = -1;

pub const FORMAT_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

/// Resource usage of one task, as carried in a usage report.
/// Times are epoch milliseconds, `-1` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUsage {
    pub task_id: String,
    pub task_name: String,
    #[serde(default = "unknown_time")]
    pub task_start_time: i64,
    #[serde(default = "unknown_time")]
    pub task_finished_time: i64,
    #[serde(default)]
    pub task_execution_duration: i64,
    #[serde(default)]
    pub task_node_number: i64,
}

fn unknown_time() -> i64 {
    UNKNOWN_TIME
}

impl Default for TaskUsage {
    fn default() -> Self {
        TaskUsage {
            task_id: String::new(),
            task_name: String::new(),
            task_start_time: UNKNOWN_TIME,
            task_finished_time: UNKNOWN_TIME,
            task_execution_duration: 0,
            task_node_number: 0,
        }
    }
}

impl TaskUsage {
    pub fn new(
        task_id: &str, task_name: &str, task_start_time: i64, task_finished_time: i64, task_execution_duration: i64,
        task_node_number: i64,
    ) -> Self {
        TaskUsage {
            task_id: task_id.to_string(),
            task_name: task_name.to_string(),
            task_start_time,
            task_finished_time,
            task_execution_duration,
            task_node_number,
        }
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        epoch_millis(self.task_start_time)
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        epoch_millis(self.task_finished_time)
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at().is_some()
    }

    /// `FORMAT_DATETIME` rendering, empty when unknown
    pub fn started_at_string(&self) -> String {
        self.started_at().map(|t| t.format(FORMAT_DATETIME).to_string()).unwrap_or_default()
    }

    pub fn finished_at_string(&self) -> String {
        self.finished_at().map(|t| t.format(FORMAT_DATETIME).to_string()).unwrap_or_default()
    }
}

fn epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    if millis < 0 {
        return None;
    }
    DateTime::from_timestamp_millis(millis)
}
