//! 授权信息提取

use std::fmt;

const TOKEN_PREFIXES: &[&str] = &["DeepL-Auth-Key ", "Bearer "];

/// 从 Authorization 头中提取令牌，去掉已知前缀；不会失败，空值由调用方拒绝
pub fn extract_token(header_value: &str) -> &str {
    TOKEN_PREFIXES
        .iter()
        .find_map(|prefix| header_value.strip_prefix(prefix))
        .unwrap_or(header_value)
}

/// 透传给上游的不透明凭证
///
/// `Debug` 输出已脱敏，只有显式调用 [`Credential::expose`] 才能拿到明文
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn from_header(header_value: &str) -> Self {
        Self(extract_token(header_value).to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// 日志中使用的掩码形式
    pub fn redacted(&self) -> String {
        let visible: String = self.0.chars().take(4).collect();
        if self.0.chars().count() <= 4 {
            "****".to_string()
        } else {
            format!("{}****", visible)
        }
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.redacted()).finish()
    }
}
