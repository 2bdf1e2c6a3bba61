//! 翻译网关主程序入口

use std::str::FromStr;

use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, reload, Registry};

use translate_gateway::env::{self, EnvVar};
use translate_gateway::translation::ConfigManager;
use translate_gateway::web::{GatewayServer, WebConfig};

/// Batch translation gateway in front of a single-text upstream
#[derive(Parser, Debug)]
#[command(name = "translate-gateway", version, about)]
struct Cli {
    /// Config file (yaml, toml or json); overrides GATEWAY_CONFIG and the default search paths
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Bind address
    #[arg(short, long, value_name = "ADDRESS")]
    bind: Option<String>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Write an example config file to PATH and exit
    #[arg(long, value_name = "PATH")]
    generate_config: Option<String>,
}

fn env_help() -> String {
    let mut help = String::from("ENVIRONMENT:\n");
    for (name, description) in env::describe_all() {
        help.push_str(&format!("    {:<34} {}\n", name, description));
    }
    help
}

/// 安装日志订阅器，返回的句柄用于在配置加载后调整级别
fn init_logging(level: &str) -> reload::Handle<LevelFilter, Registry> {
    let level = Level::from_str(level).unwrap_or(Level::INFO);
    let (filter, handle) = reload::Layer::new(LevelFilter::from_level(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
    handle
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Cli::command().after_long_help(env_help()).get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if let Some(path) = cli.generate_config {
        ConfigManager::generate_example_config(&path)?;
        println!("示例配置已写入: {}", path);
        return Ok(());
    }

    // 订阅器需在加载配置之前安装
    ConfigManager::load_dotenv();
    let log_level = match cli.log_level {
        Some(level) => env::core::LogLevel::parse(&level)?,
        None => env::core::LogLevel::get()?,
    };
    let log_handle = init_logging(&log_level);

    let mut config = ConfigManager::load(cli.config.as_deref())?.into_config();

    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if config.debug.enabled {
        log_handle.modify(|filter| {
            if *filter < LevelFilter::DEBUG {
                *filter = LevelFilter::DEBUG;
            }
        })?;
    }

    config.log_summary();

    let server = GatewayServer::new(WebConfig::from_gateway(&config), config);
    server.start().await?;

    Ok(())
}
