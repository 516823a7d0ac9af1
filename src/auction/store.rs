/// 경매 레코드 접근자
/// 경매 문서의 current_bid/bid_count/status 필드를 읽고 쓴다.
/// 쓰기 연산은 호출자가 소유한 트랜잭션 안에서 수행된다.
// region:    --- Imports
use crate::auction::model::Auction;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Postgres, Transaction};

// endregion: --- Imports

// region:    --- Reads

/// 경매 단건 조회 + 행 잠금
/// 동일 경매에 대한 동시 입찰/종료를 직렬화하는 지점이다.
pub async fn get_for_update(
    tx: &mut Transaction<'_, Postgres>,
    auction_id: i64,
) -> Result<Option<Auction>, sqlx::Error> {
    sqlx::query_as::<_, Auction>("SELECT * FROM auctions WHERE id = $1 FOR UPDATE")
        .bind(auction_id)
        .fetch_optional(&mut **tx)
        .await
}

/// 종료 시각이 지난 활성 경매 id 목록 (스위프 대상)
pub async fn ended_active_ids(
    pool: &PgPool,
    now: DateTime<Utc>,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT id FROM auctions WHERE status = 'active' AND end_time <= $1 ORDER BY end_time",
    )
    .bind(now)
    .fetch_all(pool)
    .await
}

// endregion: --- Reads

// region:    --- Writes

/// 새 최고 입찰 반영
/// 조건부 갱신: 활성 상태이고 현재가가 더 낮을 때만 적용된다.
/// 반영 여부를 반환한다.
pub async fn apply_new_leading_bid(
    tx: &mut Transaction<'_, Postgres>,
    auction_id: i64,
    amount: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE auctions
         SET current_bid = $1, bid_count = bid_count + 1, updated_at = now()
         WHERE id = $2 AND status = 'active' AND current_bid < $1",
    )
    .bind(amount)
    .bind(auction_id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// 경매 종료
/// 활성 상태일 때만 적용. 낙찰자가 있으면 24시간 수락 기한을 설정한다.
pub async fn close(
    tx: &mut Transaction<'_, Postgres>,
    auction_id: i64,
    winner_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let acceptance_deadline = winner_id.map(|_| Utc::now() + Duration::hours(24));
    let result = sqlx::query(
        "UPDATE auctions
         SET status = 'ended', winner_id = $1, acceptance_deadline = $2, updated_at = now()
         WHERE id = $3 AND status = 'active'",
    )
    .bind(winner_id)
    .bind(acceptance_deadline)
    .bind(auction_id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() > 0)
}

// endregion: --- Writes
