/// 인증/인가 협력자 경계
/// 세션 게이트웨이가 해석한 사용자 id를 X-User-Id 헤더로 전달받는다.
/// 역할 검사는 닫힌 Role 열거형에 대한 단일 검사 함수로만 한다.
// region:    --- Imports
use crate::auction::model::User;
use crate::database::DatabaseManager;
use crate::error::AppError;
use crate::query;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

// endregion: --- Imports

// region:    --- AuthUser

/// 인증된 사용자 id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

pub const USER_ID_HEADER: &str = "x-user-id";

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

// endregion: --- AuthUser

// region:    --- Authorization

/// 인증 id를 저장된 사용자로 해석 (없으면 Unauthorized)
pub async fn current_user(db: &DatabaseManager, user_id: i64) -> Result<User, AppError> {
    query::handlers::get_user(db, user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// 운영 권한 검사 (moderator/admin)
pub async fn require_moderator(db: &DatabaseManager, user_id: i64) -> Result<User, AppError> {
    let user = current_user(db, user_id).await?;
    if !user.role.can_moderate() {
        return Err(AppError::Forbidden("운영 권한이 필요합니다".to_string()));
    }
    Ok(user)
}

// endregion: --- Authorization

// endregion: --- Tests
