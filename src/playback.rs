//! Sequential task replay
//!
//! Each recorded action becomes one executor call followed by one explicit
//! screenshot. A failing step is logged and skipped; playback never aborts
//! part way through a task.

use crate::executor::{ActionKind, ActionRequest, Executor};
use crate::task::types::Task;
use std::time::Duration;

/// A step whose executor call came back with an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub index: usize,
    pub kind: ActionKind,
    pub error: String,
}

/// Outcome of replaying one task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    pub executed: usize,
    pub failures: Vec<StepFailure>,
}

impl PlaybackReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct PlaybackEngine<'a> {
    executor: &'a dyn Executor,
    wait_before_action: Option<Duration>,
}

impl<'a> PlaybackEngine<'a> {
    pub fn new(executor: &'a dyn Executor) -> Self {
        Self {
            executor,
            wait_before_action: None,
        }
    }

    /// Extra review window before each replayed step
    pub fn with_wait_before_action(mut self, wait: Option<Duration>) -> Self {
        self.wait_before_action = wait;
        self
    }

    pub async fn play(&self, task: &Task) -> PlaybackReport {
        tracing::info!("Executing task: {}", task.name);
        if !task.description.is_empty() {
            tracing::info!("{}", task.description);
        }

        let mut report = PlaybackReport::default();
        for (index, action) in task.actions.iter().enumerate() {
            tracing::info!("Executing step {}/{}: {}", index + 1, task.actions.len(), action.kind);

            if let Some(wait) = self.wait_before_action {
                tokio::time::sleep(wait).await;
            }

            let result = self.executor.execute(action.to_request()).await;
            report.executed += 1;
            if let Some(error) = result.error {
                tracing::warn!("Step {} ({}) failed: {}", index + 1, action.kind, error);
                report.failures.push(StepFailure {
                    index,
                    kind: action.kind,
                    error,
                });
            }

            let checkpoint = self.executor.execute(ActionRequest::screenshot()).await;
            if let Some(error) = checkpoint.error {
                tracing::warn!("Checkpoint screenshot after step {} failed: {}", index + 1, error);
            }
        }

        if report.is_clean() {
            tracing::info!("Task '{}' completed successfully", task.name);
        } else {
            tracing::warn!(
                "Task '{}' completed with {} failed step(s)",
                task.name,
                report.failures.len()
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::types::{CoordinateArg, MouseButton, ToolResult};
    use crate::task::types::Action;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct MockExecutor {
        calls: Mutex<Vec<ActionRequest>>,
        fail_kind: Option<ActionKind>,
    }

    #[async_trait]
    impl Executor for MockExecutor {
        async fn execute(&self, request: ActionRequest) -> ToolResult {
            let kind = request.kind;
            self.calls.lock().push(request);
            if Some(kind) == self.fail_kind {
                return ToolResult::error("Action failed: boom");
            }
            match kind {
                ActionKind::CursorPosition => ToolResult::output("X=0,Y=0"),
                _ => ToolResult::image("aW1n"),
            }
        }
    }

    fn task() -> Task {
        Task::new(
            "demo",
            "move, click, type",
            vec![
                Action::mouse_move(0.0, 256, 192),
                Action::click(0.1, MouseButton::Left, 256, 192),
                Action::typed(0.5, "ok"),
                Action::key(0.7, "enter"),
            ],
        )
    }

    #[tokio::test]
    async fn test_each_action_followed_by_screenshot() {
        let executor = MockExecutor::default();
        let report = PlaybackEngine::new(&executor).play(&task()).await;

        assert_eq!(report.executed, 4);
        assert!(report.is_clean());
        assert_eq!(
            executor.calls.lock().clone(),
            vec![
                ActionRequest::new(ActionKind::MouseMove).with_coordinate((256, 192)),
                ActionRequest::screenshot(),
                ActionRequest::new(ActionKind::LeftClick).with_coordinate((256, 192)),
                ActionRequest::screenshot(),
                ActionRequest::new(ActionKind::Type).with_text("ok"),
                ActionRequest::screenshot(),
                ActionRequest::new(ActionKind::Key).with_text("enter"),
                ActionRequest::screenshot(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failures_do_not_abort() {
        let executor = MockExecutor {
            fail_kind: Some(ActionKind::LeftClick),
            ..Default::default()
        };
        let report = PlaybackEngine::new(&executor).play(&task()).await;

        assert_eq!(report.executed, 4);
        assert_eq!(
            report.failures,
            vec![StepFailure {
                index: 1,
                kind: ActionKind::LeftClick,
                error: "Action failed: boom".to_string(),
            }]
        );
        assert_eq!(executor.calls.lock().len(), 8);
    }

    #[tokio::test]
    async fn test_replay_is_deterministic() {
        let executor = MockExecutor::default();
        let engine = PlaybackEngine::new(&executor);
        let task = task();

        engine.play(&task).await;
        let first: Vec<ActionRequest> = executor.calls.lock().drain(..).collect();
        engine.play(&task).await;
        let second: Vec<ActionRequest> = executor.calls.lock().drain(..).collect();

        assert_eq!(first, second);
        assert!(first
            .iter()
            .filter(|r| r.kind == ActionKind::MouseMove)
            .all(|r| r.coordinate == Some(CoordinateArg::Pair(256, 192))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_before_action() {
        let executor = MockExecutor::default();
        let engine = PlaybackEngine::new(&executor)
            .with_wait_before_action(Some(Duration::from_secs(5)));
        let started = tokio::time::Instant::now();

        engine.play(&task()).await;

        assert!(started.elapsed() >= Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_empty_task_issues_no_calls() {
        let executor = MockExecutor::default();
        let report = PlaybackEngine::new(&executor)
            .play(&Task::new("empty", "", vec![]))
            .await;
        assert_eq!(report, PlaybackReport::default());
        assert!(executor.calls.lock().is_empty());
    }
}
