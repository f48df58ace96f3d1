use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::shared::clock::Clock;
use crate::shared::database::SessionRepository;
use crate::shared::errors::StoreError;

/// 만료 세션 정리 스케줄러
/// Expired Session Sweeper
///
/// 역할:
/// - 주기적으로 (기본 6시간) `expires_at < now`인 세션을 삭제
/// - 종료 토큰이 취소되면 루프를 빠져나옴
///
/// 처리 흐름:
/// 1. `start()`로 백그라운드 태스크 실행
/// 2. 첫 정리는 한 주기가 지난 뒤 실행
/// 3. 정리 실패는 로그만 남기고 다음 주기에 재시도
#[derive(Clone)]
pub struct SessionSweeper {
    sessions: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
    period: Duration,
}

impl SessionSweeper {
    pub fn new(sessions: Arc<dyn SessionRepository>, clock: Arc<dyn Clock>, period: Duration) -> Self {
        Self {
            sessions,
            clock,
            period,
        }
    }

    /// 만료 세션 한 번 정리
    /// Run a single sweep, returning the number of removed sessions
    pub async fn sweep_once(&self) -> Result<u64, StoreError> {
        self.sessions.sweep_expired(self.clock.now()).await
    }

    /// 스케줄러 시작
    /// Start the sweeper; it stops once `shutdown` is cancelled
    pub fn start(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // 첫 tick은 즉시 완료됨
            ticker.tick().await;

            info!(period_secs = self.period.as_secs(), "Session sweeper started");

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("Session sweeper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        match self.sweep_once().await {
                            Ok(removed) => info!(removed, "Expired sessions swept"),
                            Err(e) => error!(error = %e, "Failed to sweep expired sessions"),
                        }
                    }
                }
            }
        })
    }
}
