//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，环境变量优先于配置文件

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 仅在变量被显式设置时返回值
    fn get_if_set() -> Option<EnvResult<T>> {
        env::var(Self::NAME).ok().map(|value| Self::parse(&value))
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "GATEWAY_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 显式指定的配置文件路径
    pub struct ConfigPath;
    impl EnvVar<String> for ConfigPath {
        const NAME: &'static str = "GATEWAY_CONFIG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Path to the gateway config file (yaml, toml or json)";

        fn parse(value: &str) -> EnvResult<String> {
            let path = value.trim();
            if path.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Config path cannot be empty".to_string(),
                });
            }
            Ok(path.to_string())
        }
    }
}

/// 上游服务相关环境变量
pub mod target {
    use super::*;

    /// 上游基础 URL
    pub struct BaseUrl;
    impl EnvVar<String> for BaseUrl {
        const NAME: &'static str = "TARGET_BASE_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Upstream single-text API base URL (overrides the config file)";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Base URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 默认源语言
    pub struct DefaultSourceLang;
    impl EnvVar<String> for DefaultSourceLang {
        const NAME: &'static str = "GATEWAY_DEFAULT_SOURCE_LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Source language used when a request omits one ('auto' for detection)";

        fn parse(value: &str) -> EnvResult<String> {
            let lang = value.trim();
            if lang.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Language code cannot be empty".to_string(),
                });
            }
            Ok(lang.to_string())
        }
    }
}

/// 性能相关环境变量
pub mod performance {
    use super::*;
    use crate::translation::config::constants::{
        MAX_CONCURRENT_REQUESTS_LIMIT, MAX_REQUEST_TIMEOUT_SECS,
    };

    /// 最大并发请求数
    pub struct MaxConcurrentRequests;
    impl EnvVar<usize> for MaxConcurrentRequests {
        const NAME: &'static str = "GATEWAY_MAX_CONCURRENT_REQUESTS";
        const DEFAULT: Option<usize> = Some(10);
        const DESCRIPTION: &'static str = "Maximum concurrent upstream calls per batch";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, MAX_CONCURRENT_REQUESTS_LIMIT)
        }
    }

    /// 单次上游请求超时
    pub struct RequestTimeout;
    impl EnvVar<Duration> for RequestTimeout {
        const NAME: &'static str = "GATEWAY_REQUEST_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(30));
        const DESCRIPTION: &'static str = "Per-call upstream timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of seconds".to_string(),
            })?;

            if seconds == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout must be greater than 0".to_string(),
                });
            }

            if seconds > MAX_REQUEST_TIMEOUT_SECS {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Timeout too long (max {} seconds)", MAX_REQUEST_TIMEOUT_SECS),
                });
            }

            Ok(Duration::from_secs(seconds))
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "GATEWAY_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("0.0.0.0".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Gateway bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "GATEWAY_PORT";
        const DEFAULT: Option<u16> = Some(8080);
        const DESCRIPTION: &'static str = "Gateway listen port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;

            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port cannot be 0".to_string(),
                });
            }

            Ok(port)
        }
    }
}

/// 调试输出相关环境变量
pub mod debug {
    use super::*;

    /// 启用调试日志
    pub struct Enabled;
    impl EnvVar<bool> for Enabled {
        const NAME: &'static str = "GATEWAY_DEBUG";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Enable debug tracing";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 记录请求体
    pub struct LogRequestBody;
    impl EnvVar<bool> for LogRequestBody {
        const NAME: &'static str = "GATEWAY_LOG_REQUEST_BODY";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Trace inbound and upstream request bodies";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 记录响应体
    pub struct LogResponseBody;
    impl EnvVar<bool> for LogResponseBody {
        const NAME: &'static str = "GATEWAY_LOG_RESPONSE_BODY";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Trace upstream and outbound response bodies";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 记录请求头
    pub struct LogHeaders;
    impl EnvVar<bool> for LogHeaders {
        const NAME: &'static str = "GATEWAY_LOG_HEADERS";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Trace inbound request headers, including the credential";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 所有已知环境变量的名称与说明
pub fn describe_all() -> Vec<(&'static str, &'static str)> {
    vec![
        (core::LogLevel::NAME, core::LogLevel::DESCRIPTION),
        (core::ConfigPath::NAME, core::ConfigPath::DESCRIPTION),
        (target::BaseUrl::NAME, target::BaseUrl::DESCRIPTION),
        (target::DefaultSourceLang::NAME, target::DefaultSourceLang::DESCRIPTION),
        (
            performance::MaxConcurrentRequests::NAME,
            performance::MaxConcurrentRequests::DESCRIPTION,
        ),
        (performance::RequestTimeout::NAME, performance::RequestTimeout::DESCRIPTION),
        (web::BindAddress::NAME, web::BindAddress::DESCRIPTION),
        (web::Port::NAME, web::Port::DESCRIPTION),
        (debug::Enabled::NAME, debug::Enabled::DESCRIPTION),
        (debug::LogRequestBody::NAME, debug::LogRequestBody::DESCRIPTION),
        (debug::LogResponseBody::NAME, debug::LogResponseBody::DESCRIPTION),
        (debug::LogHeaders::NAME, debug::LogHeaders::DESCRIPTION),
    ]
}
