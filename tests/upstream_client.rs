// 上游客户端集成测试
//
// 使用真实的 reqwest 客户端访问本地上游替身

#![cfg(feature = "web")]

mod common;

use std::time::{Duration, Instant};

use common::*;
use translate_gateway::translation::{
    AggregateStatus, BatchRequest, BatchTranslator, Credential, DebugConfig, TextTranslator,
    TranslationError, UpstreamCallSpec, UpstreamClient, ERROR_MARKER_PREFIX,
};

fn spec(base_url: &str, key: &str, timeout: Duration) -> UpstreamCallSpec {
    UpstreamCallSpec::new(base_url, &Credential::from(key), "auto", "DE", timeout)
}

#[tokio::test]
async fn test_single_text_success() {
    let upstream = UpstreamDouble::start().await;
    let client = UpstreamClient::new(DebugConfig::default()).unwrap();

    let translation = client
        .translate_one("Hello", &spec(&upstream.base_url, "abc123", Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(translation.text, expected_translation("auto", "DE", "Hello"));
    assert_eq!(translation.detected_source_language, "EN");
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_non_200_status_carries_status_and_body() {
    let upstream = UpstreamDouble::start().await;
    let client = UpstreamClient::new(DebugConfig::default()).unwrap();

    let error = client
        .translate_one("Hello", &spec(&upstream.base_url, REJECTED_KEY, Duration::from_secs(5)))
        .await
        .unwrap_err();

    assert_eq!(
        error,
        TranslationError::UpstreamError {
            status: 403,
            body: "invalid key".to_string()
        }
    );
}

#[tokio::test]
async fn test_unparsable_body_is_serialization_error() {
    let upstream = UpstreamDouble::start().await;
    let client = UpstreamClient::new(DebugConfig::default()).unwrap();

    let error = client
        .translate_one(GARBAGE_TEXT, &spec(&upstream.base_url, "abc123", Duration::from_secs(5)))
        .await
        .unwrap_err();

    assert!(matches!(error, TranslationError::SerializationError(_)));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // 绑定后立即释放，得到一个无人监听的端口
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = UpstreamClient::new(DebugConfig::default()).unwrap();
    let error = client
        .translate_one("Hello", &spec(&format!("http://{}", addr), "abc123", Duration::from_secs(5)))
        .await
        .unwrap_err();

    assert!(error.is_unit_failure());
    assert!(!matches!(error, TranslationError::UpstreamError { .. }));
}

#[tokio::test]
async fn test_batch_with_slow_unit_finishes_near_timeout() {
    let upstream = UpstreamDouble::start().await;
    let config = TestConfigBuilder::new(&upstream.base_url)
        .request_timeout_secs(1)
        .build();
    let translator = BatchTranslator::from_config(&config).unwrap();

    let started = Instant::now();
    let (response, status) = translator
        .translate(
            BatchRequest::new(["first", SLOW_TEXT, "third"], "FR"),
            &Credential::from_header("Bearer abc123"),
        )
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(status, AggregateStatus::Partial { failed: 1 });
    assert_eq!(
        response.translations[0].text,
        expected_translation("auto", "FR", "first")
    );
    assert!(response.translations[1].text.starts_with(ERROR_MARKER_PREFIX));
    assert_eq!(response.translations[1].detected_source_language, "auto");
    assert_eq!(
        response.translations[2].text,
        expected_translation("auto", "FR", "third")
    );
}

#[tokio::test]
async fn test_batch_uses_explicit_source_lang() {
    let upstream = UpstreamDouble::start().await;
    let config = TestConfigBuilder::new(&upstream.base_url)
        .max_concurrent_requests(2)
        .build();
    let translator = BatchTranslator::from_config(&config).unwrap();

    let texts: Vec<String> = (0..6).map(|i| format!("line {}", i)).collect();
    let (response, status) = translator
        .translate(
            BatchRequest::new(texts.clone(), "ZH").with_source_lang("EN"),
            &Credential::from_header("DeepL-Auth-Key abc123"),
        )
        .await
        .unwrap();

    assert_eq!(status, AggregateStatus::Complete);
    assert_eq!(upstream.calls(), 6);
    for (translation, text) in response.translations.iter().zip(&texts) {
        assert_eq!(translation.text, expected_translation("EN", "ZH", text));
        assert_eq!(translation.detected_source_language, "EN");
    }
}
