//! 后台任务管理
//!
//! 所有后台任务共享一个取消令牌。关闭时先取消令牌，再在宽限期内等待
//! 每个任务退出，超时的任务直接 abort。

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::{Duration, timeout};
use tokio_util::sync::CancellationToken;

/// 关闭时每个任务的等待上限
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

struct RegisteredTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// 后台任务管理器
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// tasks.spawn("schedule_refresh", |shutdown| {
///     ScheduleRefreshWorker::new(state, shutdown).run()
/// });
///
/// tasks.shutdown().await;
/// ```
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// 启动任务；`make` 收到共享的取消令牌
    ///
    /// panic 会被捕获并记录，不会影响其他任务。
    pub fn spawn<M, F>(&mut self, name: &'static str, make: M)
    where
        M: FnOnce(CancellationToken) -> F,
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.shutdown.clone();
        let future = make(token.clone());

        let handle = tokio::spawn(async move {
            match AssertUnwindSafe(future).catch_unwind().await {
                Ok(()) if !token.is_cancelled() => {
                    tracing::warn!(task = %name, "Background task exited before shutdown");
                }
                Ok(()) => {}
                Err(payload) => {
                    tracing::error!(
                        task = %name,
                        panic = %panic_message(payload.as_ref()),
                        "Background task panicked"
                    );
                }
            }
        });

        tracing::debug!(task = %name, "Registered background task");
        self.tasks.push(RegisteredTask { name, handle });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 取消所有任务并等待退出
    pub async fn shutdown(self) {
        tracing::info!("Stopping {} background tasks...", self.tasks.len());
        self.shutdown.cancel();

        for mut task in self.tasks {
            match timeout(SHUTDOWN_GRACE, &mut task.handle).await {
                Ok(Ok(())) => {
                    tracing::debug!(task = %task.name, "Task stopped");
                }
                Ok(Err(e)) => {
                    tracing::error!(task = %task.name, error = ?e, "Task failed to join");
                }
                Err(_) => {
                    tracing::warn!(task = %task.name, "Task ignored cancellation, aborting");
                    task.handle.abort();
                }
            }
        }

        tracing::info!("All background tasks stopped");
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}
