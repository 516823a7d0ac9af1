/// 입찰 원장 접근자
/// 입찰 행은 추가 전용이며, is_winning 플래그 전환 외에는 수정하지 않는다.
// region:    --- Imports
use crate::auction::model::Bid;
use sqlx::{Postgres, Transaction};

// endregion: --- Imports

// region:    --- Bid Ledger

/// 최고 입찰 조회
/// 금액 내림차순, 동률이면 먼저 들어온 입찰이 우선한다.
/// 모든 종료 경로가 이 단일 쿼리로 낙찰자를 결정한다.
pub async fn highest_bid(
    tx: &mut Transaction<'_, Postgres>,
    auction_id: i64,
) -> Result<Option<Bid>, sqlx::Error> {
    sqlx::query_as::<_, Bid>(
        "SELECT * FROM bids
         WHERE auction_id = $1
         ORDER BY bid_amount DESC, bid_time ASC
         LIMIT 1",
    )
    .bind(auction_id)
    .fetch_optional(&mut **tx)
    .await
}

/// 새 입찰 기록 (is_winning = true로 삽입)
pub async fn record_bid(
    tx: &mut Transaction<'_, Postgres>,
    auction_id: i64,
    bidder_id: i64,
    amount: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO bids (auction_id, bidder_id, bid_amount, is_winning, bid_time)
         VALUES ($1, $2, $3, true, now())
         RETURNING id",
    )
    .bind(auction_id)
    .bind(bidder_id)
    .bind(amount)
    .fetch_one(&mut **tx)
    .await
}

/// 기존 선두 입찰의 is_winning 해제
/// 활성 경매당 winning 입찰은 정확히 하나여야 한다.
pub async fn demote_winning_bids(
    tx: &mut Transaction<'_, Postgres>,
    auction_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE bids SET is_winning = false WHERE auction_id = $1 AND is_winning")
        .bind(auction_id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

// endregion: --- Bid Ledger
