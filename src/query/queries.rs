/// 경매 단건 조회
pub const GET_AUCTION: &str = "SELECT * FROM auctions WHERE id = $1";

/// 경매 목록 조회 (최신 등록순)
pub const GET_ALL_AUCTIONS: &str = "SELECT * FROM auctions ORDER BY created_at DESC LIMIT $1";

/// 입찰 이력 조회 (최신순)
pub const GET_BID_HISTORY: &str = r#"
    SELECT id, auction_id, bidder_id, bid_amount, is_winning, bid_time
    FROM bids
    WHERE auction_id = $1
    ORDER BY bid_time DESC
    LIMIT $2
"#;

/// 사용자 조회
pub const GET_USER: &str = "SELECT * FROM users WHERE id = $1";
