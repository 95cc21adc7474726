//! Task Poller - 可取消的任务状态轮询
//!
//! 每个句柄一个后台循环：先休眠一个间隔，再查询一次状态。
//! 休眠前后都检查取消令牌；传输失败只记录日志，下一个周期重试；
//! 响应结构不符合约定视为失败终态。终态结果恰好交付一次。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::application::ports::{PollRegistryPort, PollTicket, TaskError};
use crate::application::{ApplicationError, GetTaskStatus, GetTaskStatusHandler};
use crate::domain::task::{PollState, TaskHandle, TaskSuccess, Transition};

/// 轮询配置
#[derive(Debug, Clone)]
pub struct TaskPollerConfig {
    /// 轮询间隔
    pub interval: Duration,
}

impl Default for TaskPollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

/// 轮询会话的终态结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Succeeded(TaskSuccess),
    Failed(String),
    /// 调用方放弃；后端任务不受影响
    Cancelled,
}

impl PollOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollOutcome::Succeeded(_) => "succeeded",
            PollOutcome::Failed(_) => "failed",
            PollOutcome::Cancelled => "cancelled",
        }
    }
}

/// 一次轮询会话
///
/// 会话被丢弃（包括 `wait` 的 future 被中途丢弃）时自动取消后台循环
pub struct PollSession {
    handle: TaskHandle,
    token: CancellationToken,
    phase: watch::Receiver<Option<String>>,
    outcome: oneshot::Receiver<PollOutcome>,
    guard: DropGuard,
}

impl PollSession {
    pub fn task_id(&self) -> &TaskHandle {
        &self.handle
    }

    /// 处理中的阶段标签（如 STARTED / PENDING）
    pub fn phase(&self) -> watch::Receiver<Option<String>> {
        self.phase.clone()
    }

    /// 取消令牌，可在等待期间从别处取消
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// 停止轮询；不影响后端任务
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// 等待终态结果
    pub async fn wait(self) -> PollOutcome {
        let PollSession {
            handle,
            outcome,
            guard,
            ..
        } = self;

        let result = match outcome.await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!(task_id = %handle, "Poll loop ended without an outcome");
                PollOutcome::Failed("Task polling stopped unexpectedly".to_string())
            }
        };
        guard.disarm();
        result
    }

    /// 终态时调用一次回调
    pub fn on_terminal<F>(self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(PollOutcome) + Send + 'static,
    {
        tokio::spawn(async move {
            let outcome = self.wait().await;
            callback(outcome);
        })
    }
}

/// 任务轮询器
pub struct TaskPoller {
    config: TaskPollerConfig,
    status_handler: Arc<GetTaskStatusHandler>,
    registry: Arc<dyn PollRegistryPort>,
}

impl TaskPoller {
    pub fn new(
        config: TaskPollerConfig,
        status_handler: Arc<GetTaskStatusHandler>,
        registry: Arc<dyn PollRegistryPort>,
    ) -> Self {
        Self {
            config,
            status_handler,
            registry,
        }
    }

    /// 为句柄启动轮询会话；同一句柄已有活跃会话时拒绝
    pub fn watch(&self, handle: TaskHandle) -> Result<PollSession, TaskError> {
        let token = CancellationToken::new();
        let ticket = self.registry.register(&handle, token.clone())?;

        let (phase_tx, phase_rx) = watch::channel(None);
        let (outcome_tx, outcome_rx) = oneshot::channel();

        let poll_loop = PollLoop {
            handle: handle.clone(),
            ticket,
            interval: self.config.interval,
            token: token.clone(),
            status_handler: self.status_handler.clone(),
            registry: self.registry.clone(),
            phase_tx,
        };
        tokio::spawn(async move {
            let outcome = poll_loop.run().await;
            // 调用方已放弃等待时接收端不存在
            let _ = outcome_tx.send(outcome);
        });

        tracing::info!(
            task_id = %handle,
            interval_secs = self.config.interval.as_secs(),
            "Polling started"
        );

        Ok(PollSession {
            handle,
            guard: token.clone().drop_guard(),
            token,
            phase: phase_rx,
            outcome: outcome_rx,
        })
    }

    /// 取消指定句柄的轮询
    pub fn cancel(&self, handle: &TaskHandle) -> bool {
        self.registry.cancel(handle)
    }

    /// 取消所有轮询
    pub fn cancel_all(&self) -> usize {
        self.registry.cancel_all()
    }

    pub fn is_polling(&self, handle: &TaskHandle) -> bool {
        self.registry.is_active(handle)
    }
}

struct PollLoop {
    handle: TaskHandle,
    ticket: PollTicket,
    interval: Duration,
    token: CancellationToken,
    status_handler: Arc<GetTaskStatusHandler>,
    registry: Arc<dyn PollRegistryPort>,
    phase_tx: watch::Sender<Option<String>>,
}

impl PollLoop {
    async fn run(self) -> PollOutcome {
        let mut state = PollState::polling();

        let outcome = loop {
            if self.token.is_cancelled() {
                break PollOutcome::Cancelled;
            }
            tokio::select! {
                _ = self.token.cancelled() => break PollOutcome::Cancelled,
                _ = tokio::time::sleep(self.interval) => {}
            }
            if self.token.is_cancelled() {
                break PollOutcome::Cancelled;
            }

            let query = GetTaskStatus {
                handle: self.handle.clone(),
            };
            let result = tokio::select! {
                _ = self.token.cancelled() => break PollOutcome::Cancelled,
                result = self.status_handler.handle(query) => result,
            };

            let transition = match result {
                Ok(status) => state.apply(status),
                Err(ApplicationError::Contract(msg)) => {
                    tracing::error!(task_id = %self.handle, error = %msg, "Status response violates contract");
                    state.fail(format!("Unexpected response from backend: {}", msg))
                }
                Err(e) => {
                    tracing::warn!(task_id = %self.handle, error = %e, "Status poll failed, retrying on next tick");
                    continue;
                }
            };

            match transition {
                Transition::Unchanged | Transition::Ignored => {}
                Transition::PhaseChanged(phase) => {
                    tracing::debug!(task_id = %self.handle, phase = ?phase, "Task phase changed");
                    self.phase_tx.send_replace(phase);
                }
                Transition::Succeeded(success) => {
                    tracing::info!(
                        task_id = %self.handle,
                        podcast_id = %success.podcast_id,
                        transcript_entries = success.transcript_entries,
                        "Task succeeded"
                    );
                    break PollOutcome::Succeeded(success);
                }
                Transition::Failed(message) => {
                    tracing::info!(task_id = %self.handle, error = %message, "Task failed");
                    break PollOutcome::Failed(message);
                }
            }
        };

        if outcome == PollOutcome::Cancelled {
            tracing::info!(task_id = %self.handle, "Polling cancelled");
        }
        self.registry.remove(&self.handle, self.ticket);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::podcast::PodcastId;
    use crate::infrastructure::adapters::{FakePodcastBackend, FakeStatusReply};
    use crate::infrastructure::memory::InMemoryPollRegistry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn success(id: i64) -> TaskSuccess {
        TaskSuccess {
            podcast_id: PodcastId::new(id),
            title: "T".to_string(),
            transcript_entries: 12,
        }
    }

    fn poller_with(replies: Vec<FakeStatusReply>) -> (TaskPoller, Arc<FakePodcastBackend>) {
        let backend = Arc::new(FakePodcastBackend::new().with_statuses(replies));
        let poller = TaskPoller::new(
            TaskPollerConfig::default(),
            Arc::new(GetTaskStatusHandler::new(backend.clone())),
            Arc::new(InMemoryPollRegistry::new()),
        );
        (poller, backend)
    }

    fn handle(id: &str) -> TaskHandle {
        TaskHandle::new(id).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_processing_twice_then_success() {
        let (poller, backend) = poller_with(vec![
            FakeStatusReply::Processing(None),
            FakeStatusReply::Processing(None),
            FakeStatusReply::Success(success(42)),
        ]);

        let session = poller.watch(handle("abc123")).unwrap();
        let outcome = session.wait().await;

        assert_eq!(outcome, PollOutcome::Succeeded(success(42)));
        assert_eq!(backend.status_calls(), 3);
        assert!(!poller.is_polling(&handle("abc123")));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(backend.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_does_not_abort() {
        let (poller, backend) = poller_with(vec![
            FakeStatusReply::Processing(None),
            FakeStatusReply::NetworkFailure,
            FakeStatusReply::Success(success(7)),
        ]);

        let outcome = poller.watch(handle("t")).unwrap().wait().await;
        assert_eq!(outcome, PollOutcome::Succeeded(success(7)));
        assert_eq!(backend.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_status_is_reported_verbatim() {
        let (poller, _) = poller_with(vec![FakeStatusReply::Error(
            "TTS provider rejected the request".to_string(),
        )]);

        let outcome = poller.watch(handle("t")).unwrap().wait().await;
        assert_eq!(
            outcome,
            PollOutcome::Failed("TTS provider rejected the request".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_contract_violation_is_terminal() {
        let (poller, backend) = poller_with(vec![
            FakeStatusReply::Malformed,
            FakeStatusReply::Success(success(1)),
        ]);

        let outcome = poller.watch(handle("t")).unwrap().wait().await;
        assert!(matches!(outcome, PollOutcome::Failed(msg) if msg.starts_with("Unexpected response")));
        assert_eq!(backend.status_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_request_waits_one_interval() {
        let (poller, backend) = poller_with(vec![]);
        let session = poller.watch(handle("t")).unwrap();

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(backend.status_calls(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(backend.status_calls(), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(backend.status_calls(), 2);

        session.cancel();
        assert_eq!(session.wait().await, PollOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_polling() {
        let (poller, backend) = poller_with(vec![]);
        let session = poller.watch(handle("t")).unwrap();

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(poller.cancel(&handle("t")));
        assert_eq!(session.wait().await, PollOutcome::Cancelled);

        let calls = backend.status_calls();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(backend.status_calls(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_session_cancels_loop() {
        let (poller, backend) = poller_with(vec![]);
        drop(poller.watch(handle("t")).unwrap());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(backend.status_calls(), 0);
        assert!(!poller.is_polling(&handle("t")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_watch_of_active_handle_is_rejected() {
        let (poller, _) = poller_with(vec![]);
        let _session = poller.watch(handle("t")).unwrap();

        assert!(matches!(
            poller.watch(handle("t")),
            Err(TaskError::AlreadyPolling(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_phase_label_is_published() {
        let (poller, _) = poller_with(vec![
            FakeStatusReply::Processing(Some("PENDING".to_string())),
            FakeStatusReply::Processing(Some("STARTED".to_string())),
            FakeStatusReply::Success(success(1)),
        ]);

        let session = poller.watch(handle("t")).unwrap();
        let phase = session.phase();
        session.wait().await;
        assert_eq!(phase.borrow().as_deref(), Some("STARTED"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_terminal_fires_exactly_once() {
        let (poller, _) = poller_with(vec![
            FakeStatusReply::Processing(None),
            FakeStatusReply::Success(success(42)),
        ]);

        let fired = Arc::new(AtomicUsize::new(0));
        let seen = fired.clone();
        let join = poller
            .watch(handle("t"))
            .unwrap()
            .on_terminal(move |outcome| {
                assert_eq!(outcome, PollOutcome::Succeeded(success(42)));
                seen.fetch_add(1, Ordering::SeqCst);
            });

        join.await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
