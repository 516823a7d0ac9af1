/// 경매 종료 스위퍼
/// 외부 스케줄러(cron) 대신 프로세스 내 주기 실행으로 종료 루틴을 호출한다.
/// HTTP 스위프 엔드포인트와 같은 단일 종료 경로(lifecycle)를 사용한다.
// region:    --- Imports
use crate::auction::lifecycle;
use crate::database::DatabaseManager;
use crate::notification::PgNotificationSink;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Auction Sweeper

/// 경매 종료 스위퍼
pub struct AuctionSweeper {
    db_manager: Arc<DatabaseManager>,
    sink: Arc<PgNotificationSink>,
    interval_secs: u64,
}

impl AuctionSweeper {
    pub fn new(
        db_manager: Arc<DatabaseManager>,
        sink: Arc<PgNotificationSink>,
        interval_secs: u64,
    ) -> Self {
        Self {
            db_manager,
            sink,
            interval_secs,
        }
    }

    /// 스위퍼 시작
    /// interval_secs가 0이면 비활성화 (외부 스케줄러가 HTTP로 트리거하는 구성)
    pub async fn start(&self) {
        if self.interval_secs == 0 {
            info!("{:<12} --> 스위퍼 비활성화", "Sweeper");
            return;
        }
        let db_manager = Arc::clone(&self.db_manager);
        let sink = Arc::clone(&self.sink);
        let secs = self.interval_secs;
        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(secs));
            loop {
                interval.tick().await;
                match lifecycle::close_ended_auctions(&db_manager, sink.as_ref()).await {
                    Ok(0) => debug!("{:<12} --> 종료 대상 없음", "Sweeper"),
                    Ok(n) => info!("{:<12} --> 경매 {}건 종료", "Sweeper", n),
                    Err(e) => error!("{:<12} --> 스위프 중 오류 발생: {:?}", "Sweeper", e),
                }
            }
        });
    }
}

// endregion: --- Auction Sweeper
