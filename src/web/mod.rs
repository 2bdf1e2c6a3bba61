//! Web 服务器模块
//!
//! 对外提供批量翻译接口与健康检查

pub mod config;
pub mod handlers;
pub mod routes;
pub mod types;

pub use config::*;
pub use handlers::*;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::translation::error::{helpers::config_error, TranslationError, TranslationResult};
use crate::translation::{BatchTranslator, GatewayConfig};

/// 网关服务器
pub struct GatewayServer {
    config: WebConfig,
    gateway: GatewayConfig,
}

impl GatewayServer {
    pub fn new(config: WebConfig, gateway: GatewayConfig) -> Self {
        Self { config, gateway }
    }

    /// 启动服务器，收到 Ctrl-C 或 SIGTERM 后停止接收新连接并等待进行中的请求结束
    pub async fn start(&self) -> TranslationResult<()> {
        self.config.validate()?;

        let translator = BatchTranslator::from_config(&self.gateway)?;
        let app = create_router(Arc::new(AppState::new(translator)));

        let address = self.config.listen_address();
        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| config_error(format!("绑定地址 {} 失败: {}", address, e)))?;

        tracing::info!("翻译网关启动: http://{}", address);
        tracing::info!("  POST /v2/translate, POST /translate-batch, GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| TranslationError::InternalError(format!("服务器错误: {}", e)))?;

        tracing::info!("翻译网关已停止");
        Ok(())
    }
}

/// 创建路由器
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_routes()
        .with_state(app_state)
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("监听 Ctrl-C 失败: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("监听 SIGTERM 失败: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("收到停止信号，正在关闭...");
}
