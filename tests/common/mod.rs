// 集成测试公共模块
//
// 提供本地上游替身服务和配置构建器

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use translate_gateway::translation::{GatewayConfig, UpstreamRequest};

/// 上游替身识别的特殊文本
pub const SLOW_TEXT: &str = "slow";
pub const FAILING_TEXT: &str = "boom";
pub const GARBAGE_TEXT: &str = "garbage";
pub const REJECTED_KEY: &str = "revoked";

/// 本地上游替身
pub struct UpstreamDouble {
    pub base_url: String,
    calls: Arc<AtomicUsize>,
}

impl UpstreamDouble {
    /// 在 127.0.0.1 的随机端口上启动
    pub async fn start() -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/:key/translate", post(fake_translate))
            .with_state(Arc::clone(&calls));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            calls,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// 译文格式：`[<source>><target>] <text>`
pub fn expected_translation(source: &str, target: &str, text: &str) -> String {
    format!("[{}>{}] {}", source, target, text)
}

async fn fake_translate(
    State(calls): State<Arc<AtomicUsize>>,
    Path(key): Path<String>,
    Json(request): Json<UpstreamRequest>,
) -> Response {
    calls.fetch_add(1, Ordering::SeqCst);

    if key == REJECTED_KEY {
        return (StatusCode::FORBIDDEN, "invalid key").into_response();
    }

    match request.text.as_str() {
        SLOW_TEXT => tokio::time::sleep(Duration::from_secs(5)).await,
        FAILING_TEXT => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
        }
        GARBAGE_TEXT => return (StatusCode::OK, "<html>not json</html>").into_response(),
        _ => {}
    }

    let detected = if request.source_lang == "auto" {
        "EN".to_string()
    } else {
        request.source_lang.clone()
    };

    Json(json!({
        "alternatives": [],
        "code": 200,
        "data": expected_translation(&request.source_lang, &request.target_lang, &request.text),
        "id": 8356681003u64,
        "method": "Free",
        "source_lang": detected,
        "target_lang": request.target_lang,
    }))
    .into_response()
}

/// 测试配置构建器
pub struct TestConfigBuilder {
    config: GatewayConfig,
}

impl TestConfigBuilder {
    pub fn new(base_url: &str) -> Self {
        let mut config = GatewayConfig::default();
        config.target.base_url = base_url.to_string();
        Self { config }
    }

    pub fn max_concurrent_requests(mut self, value: usize) -> Self {
        self.config.performance.max_concurrent_requests = value;
        self
    }

    pub fn request_timeout_secs(mut self, value: u64) -> Self {
        self.config.performance.request_timeout = value;
        self
    }

    pub fn default_source_lang(mut self, value: &str) -> Self {
        self.config.target.default_source_lang = value.to_string();
        self
    }

    pub fn build(self) -> GatewayConfig {
        self.config
    }
}
