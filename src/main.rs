// region:    --- Imports
use crate::config::Config;
use crate::database::DatabaseManager;
use crate::notification::PgNotificationSink;
use axum::extract::DefaultBodyLimit;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Modules
mod auction;
mod auth;
mod bidding;
mod config;
mod database;
mod error;
mod handlers;
mod notification;
mod query;
mod scheduler;

// endregion: --- Modules

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = Config::load();

    // DatabaseManager 생성 (풀 수명 주기는 여기서 소유)
    let db_manager = match DatabaseManager::new(&config.database_url).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("{:<12} --> 데이터베이스 연결 실패: {:?}", "Main", e);
            return Err(e.into());
        }
    };

    // 데이터베이스 초기화
    let init_result = if config.recreate_db {
        db_manager.recreate_database().await
    } else {
        db_manager.initialize_database().await
    };
    if let Err(e) = init_result {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 알림 싱크 생성
    let sink = Arc::new(PgNotificationSink::new(db_manager.get_pool()));

    // 경매 종료 스위퍼 시작
    let sweeper = scheduler::AuctionSweeper::new(
        Arc::clone(&db_manager),
        Arc::clone(&sink),
        config.sweep_interval_secs,
    );
    sweeper.start().await;

    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = handlers::routes((Arc::clone(&db_manager), sink))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024));

    // 리스너 생성
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행 (ctrl-c 시 정상 종료)
    if let Err(err) = axum::serve(listener, routes_all.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("{:<12} --> Server error: {}", "Main", err);
    }

    // 종료 시 풀 정리
    db_manager.close().await;
    Ok(())
}

/// ctrl-c 대기
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("{:<12} --> 종료 시그널 대기 실패: {:?}", "Main", e);
    }
    info!("{:<12} --> 종료 시그널 수신", "Main");
}
// endregion: --- Main
