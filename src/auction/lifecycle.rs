/// 경매 종료 컨트롤러
/// 단건 종료와 스위프가 모두 이 단일 경로를 사용한다.
/// 낙찰자 결정은 ledger::highest_bid 한 쿼리로만 한다.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus, Conversation, Role};
use crate::auction::store;
use crate::bidding::ledger;
use crate::database::DatabaseManager;
use crate::error::AppError;
use crate::notification::{emit, NewNotification, NotificationKind, NotificationSink};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Close Auction

/// 종료 결과
#[derive(Debug, Serialize)]
pub struct CloseOutcome {
    pub winner_id: Option<i64>,
    /// 이번 호출로 실제 종료되었는지 (false면 멱등 no-op)
    pub newly_closed: bool,
}

/// 경매 단건 종료
/// 이미 종료된 경매는 저장된 winner_id를 그대로 반환하는 no-op이다.
/// 부수 효과(대화 생성, 알림)는 실제 종료된 호출에서만 1회 실행된다.
pub async fn close_auction(
    db: &DatabaseManager,
    sink: &dyn NotificationSink,
    auction_id: i64,
) -> Result<CloseOutcome, AppError> {
    let mut tx = db.pool().begin().await?;

    let auction = store::get_for_update(&mut tx, auction_id)
        .await?
        .ok_or_else(|| AppError::NotFound("경매".to_string()))?;

    // 멱등 단락: 이미 active가 아니면 아무것도 바꾸지 않는다
    if auction.status != AuctionStatus::Active {
        tx.rollback().await?;
        info!(
            "{:<12} --> 이미 종료된 경매 {} (winner: {:?})",
            "Lifecycle", auction_id, auction.winner_id
        );
        return Ok(CloseOutcome {
            winner_id: auction.winner_id,
            newly_closed: false,
        });
    }

    // 낙찰자 결정: 최고 입찰자, 입찰이 없으면 없음
    let winner_id = ledger::highest_bid(&mut tx, auction_id)
        .await?
        .map(|bid| bid.bidder_id);

    store::close(&mut tx, auction_id, winner_id).await?;
    tx.commit().await?;
    info!(
        "{:<12} --> 경매 {} 종료, 낙찰자: {:?}",
        "Lifecycle", auction_id, winner_id
    );

    // 커밋 후 부수 효과 (최선 노력)
    if let Err(e) = run_close_side_effects(db, sink, &auction, winner_id).await {
        warn!(
            "{:<12} --> 경매 {} 종료 부수 효과 실패: {:?}",
            "Lifecycle", auction_id, e
        );
    }

    Ok(CloseOutcome {
        winner_id,
        newly_closed: true,
    })
}

/// 종료 부수 효과: 낙찰 시 판매자-낙찰자 대화 + 시스템 메시지 + 낙찰/판매 알림,
/// 유찰 시 판매자에게 무입찰 종료 알림 + 운영진 앞 확인 알림
async fn run_close_side_effects(
    db: &DatabaseManager,
    sink: &dyn NotificationSink,
    auction: &Auction,
    winner_id: Option<i64>,
) -> Result<(), AppError> {
    match winner_id {
        Some(winner) => {
            let conversation = create_winner_conversation(db, auction, winner).await?;
            info!(
                "{:<12} --> 경매 {} 대화 {} 생성",
                "Lifecycle", auction.id, conversation.id
            );
            emit(
                sink,
                NewNotification::to_user(
                    NotificationKind::AuctionWon,
                    "낙찰 안내",
                    format!(
                        "'{}' 경매에 낙찰되었습니다. 24시간 내에 거래를 진행해 주세요.",
                        auction.title
                    ),
                    winner,
                    Some(auction.id),
                ),
            )
            .await;
            emit(
                sink,
                NewNotification::to_user(
                    NotificationKind::AuctionSold,
                    "판매 완료",
                    format!("'{}' 경매가 낙찰자에게 판매되었습니다.", auction.title),
                    auction.seller_id,
                    Some(auction.id),
                ),
            )
            .await;
        }
        None => {
            emit(
                sink,
                NewNotification::to_user(
                    NotificationKind::AuctionEnded,
                    "경매 종료",
                    format!("'{}' 경매가 입찰 없이 종료되었습니다.", auction.title),
                    auction.seller_id,
                    Some(auction.id),
                ),
            )
            .await;
            // 유찰 경매는 운영진이 재등록 여부를 확인한다
            emit(
                sink,
                NewNotification::to_role(
                    NotificationKind::AuctionStatus,
                    "유찰 경매 확인",
                    format!("'{}' 경매가 입찰 없이 종료되어 확인이 필요합니다.", auction.title),
                    Role::Moderator,
                    Some(auction.id),
                ),
            )
            .await;
        }
    }
    Ok(())
}

/// 판매자-낙찰자 대화 생성 및 시스템 메시지 게시
async fn create_winner_conversation(
    db: &DatabaseManager,
    auction: &Auction,
    winner_id: i64,
) -> Result<Conversation, AppError> {
    let auction_id = auction.id;
    let seller_id = auction.seller_id;
    let title = auction.title.clone();
    db.transaction(|tx| {
        Box::pin(async move {
            let conversation = sqlx::query_as::<_, Conversation>(
                "INSERT INTO conversations (auction_id, seller_id, winner_id)
                 VALUES ($1, $2, $3)
                 RETURNING *",
            )
            .bind(auction_id)
            .bind(seller_id)
            .bind(winner_id)
            .fetch_one(&mut **tx)
            .await?;

            // sender_id NULL = 시스템 메시지
            sqlx::query(
                "INSERT INTO messages (conversation_id, sender_id, body)
                 VALUES ($1, NULL, $2)",
            )
            .bind(conversation.id)
            .bind(format!(
                "'{title}' 경매가 종료되었습니다. 결제와 배송을 이 대화에서 진행해 주세요."
            ))
            .execute(&mut **tx)
            .await?;

            Ok::<_, AppError>(conversation)
        })
    })
    .await
}

// endregion: --- Close Auction

// region:    --- Sweep

/// 종료 시각이 지난 활성 경매 일괄 종료
/// 한 경매의 실패는 로그만 남기고 다음 경매로 진행한다.
pub async fn close_ended_auctions(
    db: &DatabaseManager,
    sink: &dyn NotificationSink,
) -> Result<u64, AppError> {
    let candidates = store::ended_active_ids(db.pool(), Utc::now()).await?;
    if candidates.is_empty() {
        return Ok(0);
    }
    info!(
        "{:<12} --> 종료 대상 경매 {}건 처리 시작",
        "Lifecycle",
        candidates.len()
    );

    let mut closed = 0u64;
    for auction_id in candidates {
        match close_auction(db, sink, auction_id).await {
            Ok(outcome) if outcome.newly_closed => closed += 1,
            Ok(_) => {}
            Err(e) => {
                error!(
                    "{:<12} --> 경매 {} 종료 실패, 다음 경매로 진행: {:?}",
                    "Lifecycle", auction_id, e
                );
            }
        }
    }
    Ok(closed)
}

// endregion: --- Sweep
