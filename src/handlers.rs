// region:    --- Imports
use crate::auction::lifecycle;
use crate::auth::{self, AuthUser};
use crate::bidding::commands::{handle_place_bid, PlaceBidCommand};
use crate::database::DatabaseManager;
use crate::error::AppError;
use crate::notification::{self, PgNotificationSink};
use crate::query;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

/// 핸들러 공유 상태
pub type AppState = (Arc<DatabaseManager>, Arc<PgNotificationSink>);

/// 입찰 이력 기본 페이지 크기
const BID_HISTORY_PAGE: i64 = 20;

/// 라우터 구성
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/auctions", get(handle_get_auctions))
        .route("/auctions/:id", get(handle_get_auction))
        .route("/auctions/:id/bids", post(handle_bid).get(handle_get_bid_history))
        .route("/auctions/:id/close", post(handle_close_auction))
        .route("/auctions/close-ended", post(handle_close_ended))
        .route("/notifications", get(handle_get_notifications))
        .route("/notifications/:id/read", post(handle_mark_notification_read))
        .with_state(state)
}

// region:    --- Command Handlers

#[derive(Debug, Deserialize)]
pub struct BidRequest {
    pub bid_amount: i64,
}

/// 입찰 요청 처리
pub async fn handle_bid(
    State((db_manager, sink)): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(auction_id): Path<i64>,
    Json(req): Json<BidRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "{:<12} --> 입찰 요청: 경매 {}, 사용자 {}, 금액 {}",
        "Handler", auction_id, user_id, req.bid_amount
    );

    // 인증 id가 실제 사용자에 대응하는지 확인
    let bidder = auth::current_user(&db_manager, user_id).await?;

    let outcome = handle_place_bid(
        PlaceBidCommand {
            auction_id,
            bidder_id: bidder.id,
            bid_amount: req.bid_amount,
        },
        &db_manager,
        sink.as_ref(),
    )
    .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "current_bid": outcome.current_bid,
        "bid_id": outcome.bid_id,
    })))
}

/// 경매 단건 종료 요청 처리 (moderator/admin)
pub async fn handle_close_auction(
    State((db_manager, sink)): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "{:<12} --> 경매 종료 요청: 경매 {}, 사용자 {}",
        "Handler", auction_id, user_id
    );
    auth::require_moderator(&db_manager, user_id).await?;

    let outcome = lifecycle::close_auction(&db_manager, sink.as_ref(), auction_id).await?;
    let message = if outcome.newly_closed {
        "경매가 종료되었습니다"
    } else {
        "이미 종료된 경매입니다"
    };
    Ok(Json(serde_json::json!({
        "message": message,
        "winner_id": outcome.winner_id,
    })))
}

/// 종료 시각이 지난 활성 경매 일괄 종료 (moderator/admin, 외부 스케줄러 트리거용)
pub async fn handle_close_ended(
    State((db_manager, sink)): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 경매 스위프 요청: 사용자 {}", "Handler", user_id);
    auth::require_moderator(&db_manager, user_id).await?;

    let closed = lifecycle::close_ended_auctions(&db_manager, sink.as_ref()).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "closed": closed,
    })))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 경매 목록 조회
pub async fn handle_get_auctions(
    State((db_manager, _)): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 경매 목록 조회", "HandlerQuery");
    let auctions = query::handlers::get_all_auctions(&db_manager, 100).await?;
    Ok(Json(serde_json::json!({ "auctions": auctions })))
}

/// 경매 상태 조회
pub async fn handle_get_auction(
    State((db_manager, _)): State<AppState>,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 경매 조회 id: {}", "HandlerQuery", auction_id);
    let auction = query::handlers::get_auction(&db_manager, auction_id)
        .await?
        .ok_or_else(|| AppError::NotFound("경매".to_string()))?;
    Ok(Json(auction))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

/// 입찰 이력 조회 (최신순, 페이지 크기 제한)
pub async fn handle_get_bid_history(
    State((db_manager, _)): State<AppState>,
    Path(auction_id): Path<i64>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "HandlerQuery", auction_id);
    let limit = params.limit.unwrap_or(BID_HISTORY_PAGE).clamp(1, 100);
    let bids = query::handlers::get_bid_history(&db_manager, auction_id, limit).await?;
    Ok(Json(serde_json::json!({ "bids": bids })))
}

/// 알림 목록 + 읽지 않은 수 조회
pub async fn handle_get_notifications(
    State((db_manager, _)): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 알림 조회 사용자: {}", "HandlerQuery", user_id);
    let user = auth::current_user(&db_manager, user_id).await?;
    let notifications =
        notification::list_for_user(db_manager.pool(), user.id, user.role, 50).await?;
    let unread = notification::unread_count(db_manager.pool(), user.id, user.role).await?;
    Ok(Json(serde_json::json!({
        "notifications": notifications,
        "unread_count": unread,
    })))
}

/// 알림 읽음 처리
pub async fn handle_mark_notification_read(
    State((db_manager, _)): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(notification_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        "{:<12} --> 알림 읽음 처리 id: {}, 사용자: {}",
        "Handler", notification_id, user_id
    );
    let user = auth::current_user(&db_manager, user_id).await?;
    let updated =
        notification::mark_read(db_manager.pool(), notification_id, user.id, user.role).await?;
    if !updated {
        return Err(AppError::NotFound("알림".to_string()));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

// endregion: --- Query Handlers
