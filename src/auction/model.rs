/// 경매 도메인 모델
/// 금액은 최소 화폐 단위 정수(BIGINT)로 저장한다.
// region:    --- Imports
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// endregion: --- Imports

// region:    --- Auction

/// 경매 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "auction_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    PendingReview,
    Active,
    Ended,
    Rejected,
    Cancelled,
}

/// 경매 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Auction {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub starting_bid: i64,
    pub current_bid: i64,
    pub bid_count: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub seller_id: i64,
    pub winner_id: Option<i64>,
    pub status: AuctionStatus,
    pub acceptance_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// endregion: --- Auction

// region:    --- Bid

/// 입찰 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub auction_id: i64,
    pub bidder_id: i64,
    pub bid_amount: i64,
    pub is_winning: bool,
    pub bid_time: DateTime<Utc>,
}

// endregion: --- Bid

// region:    --- User / Role

/// 사용자 역할 (닫힌 열거형, 권한 검사는 can_moderate 하나로 한다)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Moderator,
    Admin,
    Delivery,
    PaymentManager,
    Marketing,
    Support,
}

impl Role {
    /// 경매 종료/검수 등 운영 작업 권한
    pub fn can_moderate(self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }
}

/// 사용자 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// endregion: --- User / Role

// region:    --- Conversation

/// 판매자-낙찰자 대화 (경매 종료 시 생성, 시스템 메시지는 sender 없이 게시된다)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: i64,
    pub auction_id: i64,
    pub seller_id: i64,
    pub winner_id: i64,
    pub created_at: DateTime<Utc>,
}

// endregion: --- Conversation

// endregion: --- Tests
