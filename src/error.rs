/// 서비스 공통 에러 타입
/// 검증 오류는 4xx + 메시지로, 예기치 못한 오류는 로그 후 500으로 변환한다.
// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// region:    --- AppError

/// 경매 서비스 에러 분류
#[derive(Error, Debug)]
pub enum AppError {
    /// 인증 정보 없음/잘못됨
    #[error("인증이 필요합니다")]
    Unauthorized,

    /// 권한 없음 (셀프 입찰, 역할 부족)
    #[error("권한이 없습니다: {0}")]
    Forbidden(String),

    /// 대상 없음
    #[error("{0}을(를) 찾을 수 없습니다")]
    NotFound(String),

    /// 현재가 이하 입찰
    #[error("입찰 금액이 현재 가격보다 낮거나 같습니다")]
    InvalidBid { current_bid: i64 },

    /// 필드 누락, 비양수 금액 등
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 경매 종료 시각 경과
    #[error("경매가 이미 종료되었습니다")]
    Expired,

    /// 동시 입찰 경합에서 패배 (행 잠금이 있어 정상 경로에서는 발생하지 않음)
    #[error("동시 입찰 충돌")]
    Conflict,

    /// 스토리지/내부 오류
    #[error("내부 오류: {0}")]
    Internal(#[from] sqlx::Error),
}

impl AppError {
    /// 응답 코드 문자열
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidBid { .. } => "LOW_BID",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Expired => "ALREADY_ENDED",
            AppError::Conflict => "CONFLICT",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    /// HTTP 상태 코드 매핑
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidBid { .. } | AppError::InvalidInput(_) | AppError::Expired => {
                StatusCode::BAD_REQUEST
            }
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 내부 오류는 상세를 로그로만 남기고 일반 메시지 반환
        let body = match &self {
            AppError::Internal(e) => {
                error!("{:<12} --> 내부 오류: {:?}", "Error", e);
                serde_json::json!({
                    "error": "내부 서버 오류",
                    "code": self.code(),
                })
            }
            AppError::InvalidBid { current_bid } => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "current_bid": current_bid,
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

// endregion: --- AppError

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    /// 에러 분류별 HTTP 상태 코드 매핑 확인
    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Forbidden("셀프 입찰".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("경매".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidBid { current_bid: 100 }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Expired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Internal(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    /// 코드 문자열 확인
    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::InvalidBid { current_bid: 0 }.code(), "LOW_BID");
        assert_eq!(AppError::Expired.code(), "ALREADY_ENDED");
        assert_eq!(AppError::Unauthorized.code(), "UNAUTHORIZED");
    }
}
// endregion: --- Tests
