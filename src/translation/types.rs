//! 批量接口与上游单条接口的线上数据结构

use serde::{Deserialize, Serialize};

/// 入站批量翻译请求
///
/// `text` 与 `target_lang` 缺失时反序列化为空值，由批量翻译器统一校验并给出具体原因
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub text: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
    #[serde(default)]
    pub target_lang: String,
}

impl BatchRequest {
    pub fn new<I, S>(texts: I, target_lang: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: texts.into_iter().map(Into::into).collect(),
            source_lang: None,
            target_lang: target_lang.to_string(),
        }
    }

    pub fn with_source_lang(mut self, source_lang: &str) -> Self {
        self.source_lang = Some(source_lang.to_string());
        self
    }
}

/// 单条翻译结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub detected_source_language: String,
    pub text: String,
}

/// 出站批量翻译响应，与请求的 `text` 逐位对齐
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub translations: Vec<Translation>,
}

/// 发往上游的单条请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// 上游单条响应
///
/// 仅使用 `data` 与 `source_lang`，其余字段（alternatives、code、id、method）忽略
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpstreamResponse {
    pub data: String,
    #[serde(default)]
    pub source_lang: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_request_missing_fields_default_to_empty() {
        let request: BatchRequest = serde_json::from_str("{}").unwrap();
        assert!(request.text.is_empty());
        assert!(request.source_lang.is_none());
        assert!(request.target_lang.is_empty());
    }

    #[test]
    fn test_upstream_response_ignores_extra_fields() {
        let body = r#"{
            "alternatives": ["Hallo Welt"],
            "code": 200,
            "data": "Hallo, Welt",
            "id": 8356681003,
            "method": "Free",
            "source_lang": "EN",
            "target_lang": "DE"
        }"#;
        let response: UpstreamResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.data, "Hallo, Welt");
        assert_eq!(response.source_lang, "EN");
    }

    #[test]
    fn test_upstream_response_requires_data() {
        assert!(serde_json::from_str::<UpstreamResponse>(r#"{"source_lang":"EN"}"#).is_err());
    }

    #[test]
    fn test_response_field_names() {
        let response = BatchResponse {
            translations: vec![Translation {
                detected_source_language: "EN".to_string(),
                text: "你好".to_string(),
            }],
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["translations"][0]["detected_source_language"], "EN");
        assert_eq!(value["translations"][0]["text"], "你好");
    }
}
