/// 환경 변수 기반 서비스 설정
// region:    --- Imports
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::info;

// endregion: --- Imports

// region:    --- Config

/// 서비스 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 웹 서버 바인드 주소
    pub bind_addr: String,
    /// PostgreSQL 접속 URL
    pub database_url: String,
    /// 종료된 경매 스위프 주기(초), 0이면 비활성화
    pub sweep_interval_secs: u64,
    /// 시작 시 스키마 재생성 여부 (테스트용)
    pub recreate_db: bool,
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn load() -> Self {
        Self {
            bind_addr: load_or("BIND_ADDR", "0.0.0.0:3000"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            sweep_interval_secs: load_or("SWEEP_INTERVAL_SECS", "60"),
            recreate_db: load_or("RECREATE_DB", "false"),
        }
    }
}

/// 환경 변수 조회, 없으면 기본값 사용
fn load_or<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{:<12} --> {}가 없어 기본값 사용: {}", "Config", key, default);
        default.to_string()
    });
    raw.parse()
        .unwrap_or_else(|e| panic!("{key} 값이 잘못되었습니다: {e}"))
}

// endregion: --- Config

// endregion: --- Tests
