//! Web 服务器配置

use crate::translation::error::{helpers::config_error, TranslationResult};
use crate::translation::GatewayConfig;

/// Web 服务器配置
#[derive(Debug, Clone, PartialEq)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
}

impl WebConfig {
    /// 从网关配置中取出监听设置
    pub fn from_gateway(config: &GatewayConfig) -> Self {
        Self {
            bind_addr: config.server.bind_addr.clone(),
            port: config.server.port,
        }
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.bind_addr.is_empty() {
            return Err(config_error("绑定地址不能为空"));
        }

        if self.port == 0 {
            return Err(config_error("端口不能为0"));
        }

        Ok(())
    }

    /// 获取完整的监听地址
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
