//! File tasks (actions that can open the current selection).

use serde::{Deserialize, Serialize};

/// Identifies a task across refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub app_id: String,
    pub task_type: String,
    pub action_id: String,
}

/// One task as answered by the task resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTask {
    pub descriptor: TaskDescriptor,
    pub title: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Handlers that accept any file type. Never picked as default.
    #[serde(default)]
    pub is_generic_file_handler: bool,
}

/// Tasks available for the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTasks {
    pub tasks: Vec<FileTask>,
    pub default_task: Option<TaskDescriptor>,
}

impl FileTasks {
    /// Builds the task record, picking the first non-generic task as default.
    pub fn new(tasks: Vec<FileTask>) -> Self {
        let default_task = tasks
            .iter()
            .find(|t| !t.is_generic_file_handler)
            .map(|t| t.descriptor.clone());
        Self {
            tasks,
            default_task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(app_id: &str, generic: bool) -> FileTask {
        FileTask {
            descriptor: TaskDescriptor {
                app_id: app_id.into(),
                task_type: "app".into(),
                action_id: "open".into(),
            },
            title: app_id.into(),
            icon_url: None,
            is_generic_file_handler: generic,
        }
    }

    #[test]
    fn first_non_generic_task_is_default() {
        let tasks = FileTasks::new(vec![
            task("any", true),
            task("viewer", false),
            task("editor", false),
        ]);
        assert_eq!(tasks.default_task.unwrap().app_id, "viewer");
        assert_eq!(tasks.tasks.len(), 3);
    }

    #[test]
    fn generic_only_has_no_default() {
        let tasks = FileTasks::new(vec![task("any", true), task("other", true)]);
        assert!(tasks.default_task.is_none());
    }

    #[test]
    fn empty_has_no_default() {
        assert_eq!(FileTasks::new(Vec::new()), FileTasks::default());
    }
}
