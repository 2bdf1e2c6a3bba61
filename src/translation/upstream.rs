//! 上游单条翻译接口
//!
//! [`TextTranslator`] 是批量翻译器派发的最小工作单元，[`UpstreamClient`] 是基于 reqwest 的实现

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::translation::config::DebugConfig;
use crate::translation::error::{helpers::config_error, TranslationError, TranslationResult};
use crate::translation::token::Credential;
use crate::translation::types::{Translation, UpstreamRequest, UpstreamResponse};

/// 单个批次内所有工作单元共享的只读上下文
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamCallSpec {
    pub url: String,
    pub source_lang: String,
    pub target_lang: String,
    pub timeout: Duration,
}

impl UpstreamCallSpec {
    /// 上游地址形如 `<base_url>/<credential>/translate`
    pub fn new(
        base_url: &str,
        credential: &Credential,
        source_lang: &str,
        target_lang: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            url: upstream_url(base_url, credential),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            timeout,
        }
    }
}

pub fn upstream_url(base_url: &str, credential: &Credential) -> String {
    format!(
        "{}/{}/translate",
        base_url.trim_end_matches('/'),
        credential.expose()
    )
}

/// 单条文本翻译
///
/// 实现不得持有跨调用的可变状态，批量翻译器会并发调用同一个实例
#[async_trait]
pub trait TextTranslator: Send + Sync {
    async fn translate_one(
        &self,
        text: &str,
        spec: &UpstreamCallSpec,
    ) -> TranslationResult<Translation>;
}

/// 基于 HTTP 的上游客户端
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    debug: DebugConfig,
}

impl UpstreamClient {
    pub fn new(debug: DebugConfig) -> TranslationResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| config_error(format!("创建HTTP客户端失败: {}", e)))?;
        Ok(Self { client, debug })
    }
}

#[async_trait]
impl TextTranslator for UpstreamClient {
    async fn translate_one(
        &self,
        text: &str,
        spec: &UpstreamCallSpec,
    ) -> TranslationResult<Translation> {
        let payload = UpstreamRequest {
            text: text.to_string(),
            source_lang: spec.source_lang.clone(),
            target_lang: spec.target_lang.clone(),
        };

        if self.debug.request_bodies() {
            tracing::debug!(
                "上游请求体: {}",
                serde_json::to_string_pretty(&payload).unwrap_or_default()
            );
        }

        let started = Instant::now();
        let response = self
            .client
            .post(&spec.url)
            .json(&payload)
            .timeout(spec.timeout)
            .send()
            .await
            .map_err(|e| {
                TranslationError::from(e).with_context(format!("耗时: {:?}", started.elapsed()))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranslationError::NetworkError(format!("读取响应失败: {}", e)))?;

        if self.debug.enabled {
            tracing::debug!("上游响应: 状态 {}, 耗时 {:?}", status, started.elapsed());
        }
        if self.debug.response_bodies() {
            tracing::debug!("上游响应体: {}", body);
        }

        if status != StatusCode::OK {
            return Err(TranslationError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        let reply: UpstreamResponse = serde_json::from_str(&body)
            .map_err(|e| TranslationError::SerializationError(format!("解析响应失败: {}", e)))?;

        Ok(Translation {
            detected_source_language: reply.source_lang,
            text: reply.data,
        })
    }
}
