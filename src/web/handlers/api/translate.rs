//! 批量翻译API处理器

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
};

use crate::translation::{BatchRequest, BatchResponse, Credential, TranslationError};
use crate::web::types::{AppState, ErrorResponse};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// 批量翻译
///
/// 全部成功返回 200，部分失败返回 206，响应体始终与输入逐条对应
pub async fn translate_batch(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    if state.debug.headers() {
        for (name, value) in headers.iter() {
            tracing::debug!("请求头 {}: {}", name, value.to_str().unwrap_or("<binary>"));
        }
    }

    let Json(request) = payload.map_err(|rejection| {
        tracing::info!("请求体解析失败: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("无效的请求格式").with_details(rejection.body_text())),
        )
    })?;

    if state.debug.request_bodies() {
        tracing::debug!(
            "请求体: {}",
            serde_json::to_string_pretty(&request).unwrap_or_default()
        );
    }

    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let credential = Credential::from_header(authorization);

    let (response, status) = state
        .translator
        .translate(request, &credential)
        .await
        .map_err(error_response)?;

    if state.debug.response_bodies() {
        tracing::debug!(
            "响应体: {}",
            serde_json::to_string_pretty(&response).unwrap_or_default()
        );
    }

    let code = StatusCode::from_u16(status.status_code()).unwrap_or(StatusCode::OK);
    Ok((code, Json(response)))
}

/// 将批次级错误映射为 HTTP 响应
pub fn error_response(error: TranslationError) -> ApiError {
    crate::translation::error::helpers::log_error(&error);

    match error {
        TranslationError::InvalidRequest(msg) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg)))
        }
        TranslationError::SerializationError(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("无效的请求格式").with_details(msg)),
        ),
        TranslationError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(
                ErrorResponse::new(TranslationError::Unauthorized.to_string()).with_details(
                    "请在 Authorization 头中提供 'DeepL-Auth-Key [token]' 格式的授权信息",
                ),
            ),
        ),
        error @ (TranslationError::ConfigError(_) | TranslationError::InternalError(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(error.to_string())),
        ),
        error => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new(error.to_string())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let (status, Json(body)) =
            error_response(TranslationError::InvalidRequest("text 参数是必需的".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "text 参数是必需的");
        assert!(body.details.is_none());

        let (status, Json(body)) = error_response(TranslationError::Unauthorized);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "缺少授权信息");
        assert!(body.details.unwrap().contains("DeepL-Auth-Key"));

        let (status, _) = error_response(TranslationError::InternalError("x".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = error_response(TranslationError::NetworkError("x".to_string()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
