/// 입찰 커맨드 처리
/// 검증 → 기존 선두 해제 → 입찰 기록 → 경매 반영 → 알림 순서로 진행한다.
/// 읽기-검증-쓰기 전 구간이 행 잠금이 걸린 단일 트랜잭션 안에서 수행되므로
/// 같은 경매에 대한 동시 입찰은 직렬화된다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus};
use crate::auction::store;
use crate::bidding::ledger;
use crate::database::DatabaseManager;
use crate::error::AppError;
use crate::notification::{emit, NewNotification, NotificationKind, NotificationSink};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Commands

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub auction_id: i64,
    pub bidder_id: i64,
    pub bid_amount: i64,
}

/// 입찰 결과
#[derive(Debug, Serialize)]
pub struct BidOutcome {
    pub bid_id: i64,
    pub current_bid: i64,
}

/// 입찰 검증 (순수 함수)
pub fn validate_bid(
    auction: &Auction,
    bidder_id: i64,
    bid_amount: i64,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if auction.status != AuctionStatus::Active {
        return Err(AppError::NotFound("활성 경매".to_string()));
    }
    // 상태가 아직 active로 읽히더라도 종료 시각이 지났으면 거부
    if now > auction.end_time {
        return Err(AppError::Expired);
    }
    if bidder_id == auction.seller_id {
        return Err(AppError::Forbidden("본인 경매에는 입찰할 수 없습니다".to_string()));
    }
    if bid_amount <= 0 {
        return Err(AppError::InvalidInput("입찰 금액은 양수여야 합니다".to_string()));
    }
    if bid_amount <= auction.current_bid {
        return Err(AppError::InvalidBid {
            current_bid: auction.current_bid,
        });
    }
    Ok(())
}

/// 입찰 처리
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    db: &DatabaseManager,
    sink: &dyn NotificationSink,
) -> Result<BidOutcome, AppError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    let mut tx = db.pool().begin().await?;

    // 경매 조회 + 행 잠금
    let auction = store::get_for_update(&mut tx, cmd.auction_id)
        .await?
        .ok_or_else(|| AppError::NotFound("경매".to_string()))?;

    validate_bid(&auction, cmd.bidder_id, cmd.bid_amount, Utc::now())?;

    // 상회 입찰 알림 대상 (기존 선두)
    let previous_leader = ledger::highest_bid(&mut tx, cmd.auction_id).await?;

    // 기존 선두 해제 후 새 입찰 기록
    ledger::demote_winning_bids(&mut tx, cmd.auction_id).await?;
    let bid_id = ledger::record_bid(&mut tx, cmd.auction_id, cmd.bidder_id, cmd.bid_amount).await?;

    // 행 잠금 하에서는 조건부 갱신이 항상 적용되어야 한다
    let applied = store::apply_new_leading_bid(&mut tx, cmd.auction_id, cmd.bid_amount).await?;
    if !applied {
        tx.rollback().await?;
        return Err(AppError::Conflict);
    }

    tx.commit().await?;
    info!(
        "{:<12} --> 입찰 성공: 경매 {}, 금액 {}",
        "Command", cmd.auction_id, cmd.bid_amount
    );

    // 커밋 후 최선 노력 알림
    if let Some(prev) = previous_leader {
        if prev.bidder_id != cmd.bidder_id {
            emit(
                sink,
                NewNotification::to_user(
                    NotificationKind::Outbid,
                    "상회 입찰 발생",
                    format!(
                        "'{}' 경매에서 회원님의 입찰({})보다 높은 입찰이 들어왔습니다.",
                        auction.title, prev.bid_amount
                    ),
                    prev.bidder_id,
                    Some(cmd.auction_id),
                ),
            )
            .await;
        }
    }
    emit(
        sink,
        NewNotification::to_user(
            NotificationKind::NewBid,
            "새 입찰 도착",
            format!(
                "'{}' 경매에 새 입찰 {}이(가) 들어왔습니다.",
                auction.title, cmd.bid_amount
            ),
            auction.seller_id,
            Some(cmd.auction_id),
        ),
    )
    .await;

    Ok(BidOutcome {
        bid_id,
        current_bid: cmd.bid_amount,
    })
}

// endregion: --- Commands

// endregion: --- Tests
