// 命令行测试

#![cfg(feature = "web")]

use assert_cmd::prelude::*;
use std::process::Command;

use translate_gateway::translation::{ConfigManager, GatewayConfig};

#[test]
fn test_help_lists_environment_variables() {
    let output = Command::cargo_bin("translate-gateway")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--generate-config"));
    assert!(stdout.contains("TARGET_BASE_URL"));
}

#[test]
fn test_generate_config_writes_loadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gateway.toml");

    Command::cargo_bin("translate-gateway")
        .unwrap()
        .arg("--generate-config")
        .arg(&path)
        .assert()
        .success();

    let config = ConfigManager::load_from_file(path.to_str().unwrap()).unwrap();
    assert_eq!(config, GatewayConfig::default());
}

#[test]
fn test_invalid_port_is_rejected() {
    Command::cargo_bin("translate-gateway")
        .unwrap()
        .args(["--port", "not-a-port"])
        .assert()
        .failure();
}

#[test]
fn test_config_loading_is_logged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "target:\n  base_url: \"ftp://not-http\"\n").unwrap();

    let output = Command::cargo_bin("translate-gateway")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .env_remove("TARGET_BASE_URL")
        .env_remove("GATEWAY_LOG_LEVEL")
        .env("GATEWAY_REQUEST_TIMEOUT", "not-a-number")
        .output()
        .unwrap();

    // 上游地址非法，启动失败；失败前的加载日志仍需输出
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("加载配置文件"), "stdout: {}", stdout);
    assert!(stdout.contains("GATEWAY_REQUEST_TIMEOUT"), "stdout: {}", stdout);
}
