/// 알림 발행기
/// 사용자 id 또는 역할 앞으로 알림 행을 삽입한다.
/// 전달 보장이 없는 최선 노력(best-effort) 부수 효과로 취급한다.
// region:    --- Imports
use crate::auction::model::Role;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

// endregion: --- Imports

// region:    --- Model

/// 알림 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Outbid,
    NewBid,
    AuctionStatus,
    AuctionWon,
    AuctionSold,
    AuctionEnded,
}

/// 저장된 알림
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub recipient_id: Option<i64>,
    pub recipient_role: Option<Role>,
    pub auction_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// 발행할 알림
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub recipient_id: Option<i64>,
    pub recipient_role: Option<Role>,
    pub auction_id: Option<i64>,
}

impl NewNotification {
    /// 특정 사용자 앞 알림
    pub fn to_user(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        recipient_id: i64,
        auction_id: Option<i64>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            recipient_id: Some(recipient_id),
            recipient_role: None,
            auction_id,
        }
    }

    /// 역할 앞 알림
    pub fn to_role(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        recipient_role: Role,
        auction_id: Option<i64>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            recipient_id: None,
            recipient_role: Some(recipient_role),
            auction_id,
        }
    }
}

// endregion: --- Model

// region:    --- Sink

/// 알림 전달 싱크
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: NewNotification) -> Result<(), sqlx::Error>;
}

/// PostgreSQL 알림 싱크
pub struct PgNotificationSink {
    pool: Arc<PgPool>,
}

impl PgNotificationSink {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for PgNotificationSink {
    async fn deliver(&self, n: NewNotification) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO notifications (kind, title, message, recipient_id, recipient_role, auction_id)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(n.kind)
        .bind(&n.title)
        .bind(&n.message)
        .bind(n.recipient_id)
        .bind(n.recipient_role)
        .bind(n.auction_id)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }
}

/// 최선 노력 발행: 실패는 로그만 남기고 무시한다
/// 알림 삽입 실패가 본 요청을 실패시키지 않는다.
pub async fn emit(sink: &dyn NotificationSink, notification: NewNotification) {
    let kind = notification.kind;
    if let Err(e) = sink.deliver(notification).await {
        warn!("{:<12} --> 알림 전달 실패 ({:?}): {:?}", "Notify", kind, e);
    }
}

// endregion: --- Sink

// region:    --- Reads

/// 사용자 알림 목록 (id 또는 역할 일치, 최신순)
pub async fn list_for_user(
    pool: &PgPool,
    user_id: i64,
    role: Role,
    limit: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications
         WHERE recipient_id = $1 OR recipient_role = $2
         ORDER BY created_at DESC
         LIMIT $3",
    )
    .bind(user_id)
    .bind(role)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// 읽지 않은 알림 수
pub async fn unread_count(pool: &PgPool, user_id: i64, role: Role) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications
         WHERE (recipient_id = $1 OR recipient_role = $2) AND NOT is_read",
    )
    .bind(user_id)
    .bind(role)
    .fetch_one(pool)
    .await
}

/// 읽음 처리 (수신자 본인 또는 역할 수신자와 같은 역할)
pub async fn mark_read(
    pool: &PgPool,
    notification_id: i64,
    user_id: i64,
    role: Role,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = true
         WHERE id = $1 AND (recipient_id = $2 OR recipient_role = $3)",
    )
    .bind(notification_id)
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

// endregion: --- Reads

// endregion: --- Tests
