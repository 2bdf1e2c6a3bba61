//! 网关配置管理模块
//!
//! 提供配置结构、默认值以及文件/环境变量加载，配置在启动时构建一次并显式传递

pub mod manager;

pub use manager::{
    ConfigManager, DebugConfig, GatewayConfig, PerformanceConfig, ServerConfig, TargetConfig,
};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 服务设置
    pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;
    pub const SERVICE_NAME: &str = "translate-gateway";

    // 上游设置
    pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
    pub const DEFAULT_SOURCE_LANG: &str = "auto";

    // 性能设置
    pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const MAX_CONCURRENT_REQUESTS_LIMIT: usize = 1000;
    pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "config.yaml",
        "config.yml",
        "config.toml",
        "gateway.toml",
        "~/.config/translate-gateway/config.toml",
    ];

    // .env 文件，按优先级排列
    pub const ENV_FILES: &[&str] = &[".env.local", ".env.development", ".env.production", ".env"];
}
