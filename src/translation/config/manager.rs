//! 配置管理器
//!
//! 配置来源按优先级从低到高：默认值、配置文件（yaml/toml/json）、环境变量

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::env::{self, EnvVar};
use crate::translation::error::{helpers::config_error, TranslationResult};

/// 网关配置
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub target: TargetConfig,
    pub performance: PerformanceConfig,
    pub debug: DebugConfig,
}

/// 监听配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// 兼容 `port: "8080"` 与 `port: 8080` 两种写法
    #[serde(with = "lenient_serde::port")]
    pub port: u16,
}

/// 上游服务配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    pub base_url: String,
    pub default_source_lang: String,
}

/// 性能配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// 单个批次内的最大并发上游请求数，0 或负数回退到默认值
    #[serde(with = "lenient_serde::count")]
    pub max_concurrent_requests: usize,
    /// 单次上游请求超时（秒），0 或负数回退到默认值
    #[serde(with = "lenient_serde::count")]
    pub request_timeout: u64,
}

/// 调试输出配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_request_body: bool,
    pub log_response_body: bool,
    pub log_headers: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: constants::DEFAULT_BIND_ADDR.to_string(),
            port: constants::DEFAULT_PORT,
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            default_source_lang: constants::DEFAULT_SOURCE_LANG.to_string(),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: constants::DEFAULT_MAX_CONCURRENT_REQUESTS,
            request_timeout: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl PerformanceConfig {
    /// 转换为Duration类型
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl DebugConfig {
    /// 调试开关打开且对应子开关打开时才输出
    pub fn request_bodies(&self) -> bool {
        self.enabled && self.log_request_body
    }

    pub fn response_bodies(&self) -> bool {
        self.enabled && self.log_response_body
    }

    pub fn headers(&self) -> bool {
        self.enabled && self.log_headers
    }
}

impl GatewayConfig {
    /// 补齐缺省值
    pub fn normalize(&mut self) {
        if self.server.bind_addr.trim().is_empty() {
            self.server.bind_addr = constants::DEFAULT_BIND_ADDR.to_string();
        }
        if self.server.port == 0 {
            self.server.port = constants::DEFAULT_PORT;
        }
        if self.target.base_url.trim().is_empty() {
            tracing::warn!("未配置上游地址，使用默认值: {}", constants::DEFAULT_BASE_URL);
            self.target.base_url = constants::DEFAULT_BASE_URL.to_string();
        }
        self.target.base_url = self.target.base_url.trim().trim_end_matches('/').to_string();
        if self.target.default_source_lang.trim().is_empty() {
            self.target.default_source_lang = constants::DEFAULT_SOURCE_LANG.to_string();
        }
        if self.performance.max_concurrent_requests == 0 {
            self.performance.max_concurrent_requests = constants::DEFAULT_MAX_CONCURRENT_REQUESTS;
        }
        if self.performance.request_timeout == 0 {
            self.performance.request_timeout = constants::DEFAULT_REQUEST_TIMEOUT.as_secs();
        }
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        let base_url = &self.target.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(config_error(format!(
                "上游地址必须以 http:// 或 https:// 开头: {}",
                base_url
            )));
        }

        if self.server.port == 0 {
            return Err(config_error("端口不能为0"));
        }

        let max_concurrent = self.performance.max_concurrent_requests;
        if !(1..=constants::MAX_CONCURRENT_REQUESTS_LIMIT).contains(&max_concurrent) {
            return Err(config_error(format!(
                "最大并发数必须在 1 到 {} 之间: {}",
                constants::MAX_CONCURRENT_REQUESTS_LIMIT,
                max_concurrent
            )));
        }

        let timeout = self.performance.request_timeout;
        if !(1..=constants::MAX_REQUEST_TIMEOUT_SECS).contains(&timeout) {
            return Err(config_error(format!(
                "请求超时必须在 1 到 {} 秒之间: {}",
                constants::MAX_REQUEST_TIMEOUT_SECS,
                timeout
            )));
        }

        Ok(())
    }

    /// 应用环境变量覆盖，非法值仅告警
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{debug, performance, target, web};

        match target::BaseUrl::get_if_set() {
            Some(Ok(base_url)) => {
                tracing::info!("环境变量覆盖上游地址: {}", base_url);
                self.target.base_url = base_url;
            }
            Some(Err(e)) => tracing::warn!("忽略环境变量: {}", e),
            None => {}
        }

        apply(target::DefaultSourceLang::get_if_set(), |v| {
            self.target.default_source_lang = v
        });
        apply(performance::MaxConcurrentRequests::get_if_set(), |v| {
            self.performance.max_concurrent_requests = v
        });
        apply(performance::RequestTimeout::get_if_set(), |v| {
            self.performance.request_timeout = v.as_secs()
        });
        apply(web::BindAddress::get_if_set(), |v| self.server.bind_addr = v);
        apply(web::Port::get_if_set(), |v| self.server.port = v);
        apply(debug::Enabled::get_if_set(), |v| self.debug.enabled = v);
        apply(debug::LogRequestBody::get_if_set(), |v| {
            self.debug.log_request_body = v
        });
        apply(debug::LogResponseBody::get_if_set(), |v| {
            self.debug.log_response_body = v
        });
        apply(debug::LogHeaders::get_if_set(), |v| self.debug.log_headers = v);
    }

    /// 记录生效的配置
    pub fn log_summary(&self) {
        tracing::info!("网关配置:");
        tracing::info!("  绑定地址: {}", self.server.bind_addr);
        tracing::info!("  端口: {}", self.server.port);
        tracing::info!("  上游基础 URL: {}", self.target.base_url);
        tracing::info!("  默认源语言: {}", self.target.default_source_lang);
        tracing::info!(
            "  最大并发请求数: {}",
            self.performance.max_concurrent_requests
        );
        tracing::info!("  请求超时时间: {}秒", self.performance.request_timeout);
        tracing::info!("  调试模式: {}", self.debug.enabled);
        if self.debug.enabled {
            tracing::info!("  - 记录请求体: {}", self.debug.log_request_body);
            tracing::info!("  - 记录响应体: {}", self.debug.log_response_body);
            tracing::info!("  - 记录请求头: {}", self.debug.log_headers);
        }
    }
}

fn apply<T>(value: Option<env::EnvResult<T>>, set: impl FnOnce(T)) {
    match value {
        Some(Ok(v)) => set(v),
        Some(Err(e)) => tracing::warn!("忽略环境变量: {}", e),
        None => {}
    }
}

/// 配置管理器
pub struct ConfigManager {
    config: GatewayConfig,
    config_path: Option<String>,
}

impl ConfigManager {
    /// 按默认搜索路径创建配置管理器
    pub fn new() -> TranslationResult<Self> {
        Self::load(None)
    }

    /// 加载配置；`explicit_path` 优先于 `GATEWAY_CONFIG` 与默认搜索路径
    pub fn load(explicit_path: Option<&str>) -> TranslationResult<Self> {
        Self::load_dotenv();

        let config_path = match explicit_path {
            Some(path) => Some(path.to_string()),
            None => Self::find_config_path(),
        };

        let mut config = match config_path {
            Some(ref path) => {
                tracing::info!("加载配置文件: {}", path);
                Self::load_from_file(path)?
            }
            None => {
                tracing::info!("未找到配置文件，使用默认配置");
                GatewayConfig::default()
            }
        };

        config.apply_env_overrides();
        config.normalize();
        config.validate()?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// 获取配置
    pub fn get_config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn into_config(self) -> GatewayConfig {
        self.config
    }

    /// 实际加载的配置文件路径
    pub fn config_path(&self) -> Option<&str> {
        self.config_path.as_deref()
    }

    fn find_config_path() -> Option<String> {
        match env::core::ConfigPath::get_if_set() {
            Some(Ok(path)) => return Some(path),
            Some(Err(e)) => tracing::warn!("忽略环境变量: {}", e),
            None => {}
        }

        constants::CONFIG_PATHS
            .iter()
            .map(|path| shellexpand::tilde(path).to_string())
            .find(|path| Path::new(path).exists())
    }

    /// 从指定文件加载配置，按扩展名选择格式
    pub fn load_from_file(path: &str) -> TranslationResult<GatewayConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| config_error(format!("读取配置文件失败: {}: {}", path, e)))?;

        if path.ends_with(".yaml") || path.ends_with(".yml") {
            Ok(serde_yaml::from_str(&content)?)
        } else if path.ends_with(".toml") {
            Ok(toml::from_str(&content)?)
        } else {
            serde_json::from_str(&content)
                .map_err(|e| config_error(format!("解析JSON配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    pub fn load_dotenv() {
        for env_file in constants::ENV_FILES {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> TranslationResult<()> {
        let config = GatewayConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| config_error(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| config_error(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}

/// 宽松的数值反序列化
mod lenient_serde {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    impl NumberOrString {
        fn into_i64(self) -> Result<i64, String> {
            match self {
                NumberOrString::Number(n) => Ok(n),
                NumberOrString::Text(s) if s.trim().is_empty() => Ok(0),
                NumberOrString::Text(s) => s
                    .trim()
                    .parse()
                    .map_err(|_| format!("无效的数值: {}", s)),
            }
        }
    }

    pub mod port {
        use super::*;
        use serde::Serializer;

        pub fn serialize<S>(port: &u16, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_u16(*port)
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<u16, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = NumberOrString::deserialize(deserializer)?
                .into_i64()
                .map_err(serde::de::Error::custom)?;
            u16::try_from(value.max(0))
                .map_err(|_| serde::de::Error::custom(format!("端口超出范围: {}", value)))
        }
    }

    /// 负数视为 0，交由 normalize 回退默认值
    pub mod count {
        use super::*;
        use serde::Serializer;

        pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
        where
            T: Copy + TryInto<u64>,
            S: Serializer,
        {
            let value: u64 = (*value)
                .try_into()
                .map_err(|_| serde::ser::Error::custom("数值超出范围"))?;
            serializer.serialize_u64(value)
        }

        pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
        where
            T: TryFrom<i64>,
            D: Deserializer<'de>,
        {
            let value = NumberOrString::deserialize(deserializer)?
                .into_i64()
                .map_err(serde::de::Error::custom)?;
            T::try_from(value.max(0))
                .map_err(|_| serde::de::Error::custom(format!("数值超出范围: {}", value)))
        }
    }
}
