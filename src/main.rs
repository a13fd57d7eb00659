//! Payment Notification Monitor CLI
//!
//! 从系统通知流中识别微信、支付宝等支付通知

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use payment_notification_monitor::{
    Classification, EnabledListenersGate, JsonLineSink, ListenerRegistry, MonitorConfig,
    NoMatchReason, NotificationService, PermissionGate, RawNotification, StaticGate,
};
use payment_notification_monitor::notification::watch_stream;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "pnm")]
#[command(about = "Payment Notification Monitor - 识别支付通知")]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 ~/.config/payment-notification-monitor/config.json）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 分类一条通知（JSON，从文件或标准输入读取）
    Classify {
        /// 通知 JSON 文件，省略时读取标准输入
        file: Option<PathBuf>,
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
    },
    /// 从标准输入读取 JSON Lines 通知流，命中的支付事件写到标准输出
    Watch {
        /// 本应用包名（用于权限检查）
        #[arg(long, requires = "enabled_listeners")]
        package: Option<String>,
        /// 系统设置 enabled_notification_listeners 的值
        #[arg(long, requires = "package")]
        enabled_listeners: Option<String>,
    },
    /// 检查通知监听权限
    CheckPermission {
        /// 本应用包名
        #[arg(long)]
        package: String,
        /// 系统设置 enabled_notification_listeners 的值
        #[arg(long, default_value = "")]
        enabled_listeners: String,
    },
    /// 显示当前生效的配置
    Config {
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("payment_notification_monitor=info,pnm=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();
    let config = MonitorConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify { file, json } => {
            let input = read_input(file.as_ref())?;
            let raw: RawNotification =
                serde_json::from_str(&input).context("Invalid notification JSON")?;

            let service = NotificationService::from_config(
                &config,
                Arc::new(ListenerRegistry::new()),
                Arc::new(StaticGate(true)),
            );
            let classification = service.on_notification_posted(&raw);
            print_classification(&classification, json)?;
        }
        Commands::Watch {
            package,
            enabled_listeners,
        } => {
            let gate: Arc<dyn PermissionGate> = match (package, enabled_listeners) {
                (Some(package), Some(listeners)) => {
                    Arc::new(EnabledListenersGate::new(package, listeners))
                }
                _ => Arc::new(StaticGate(true)),
            };
            watch(&config, gate).await?;
        }
        Commands::CheckPermission {
            package,
            enabled_listeners,
        } => {
            EnabledListenersGate::new(package, enabled_listeners)
                .ensure_access_granted()
                .context("通知监听权限未开启，请在系统设置中授予通知访问权限")?;
            println!("通知监听权限已开启");
        }
        Commands::Config { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("支付应用:");
                for app in &config.payment_apps {
                    println!("  {}", app);
                }
                println!("关键词: {}", config.keywords.join(" "));
                if !config.bundle_aliases.is_empty() {
                    println!("包名别名:");
                    for (alias, canonical) in &config.bundle_aliases {
                        println!("  {} -> {}", alias, canonical);
                    }
                }
            }
        }
    }

    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_classification(classification: &Classification, json: bool) -> Result<()> {
    if json {
        let value = match classification {
            Classification::Match(event) => serde_json::json!({
                "match": true,
                "event": event,
            }),
            Classification::NoMatch(reason) => serde_json::json!({
                "match": false,
                "reason": match reason {
                    NoMatchReason::UnrecognizedSource => "unrecognized_source",
                    NoMatchReason::NoKeyword => "no_keyword",
                },
            }),
            Classification::Malformed(message) => serde_json::json!({
                "match": false,
                "reason": "malformed",
                "message": message,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match classification {
        Classification::Match(event) => {
            println!("支付通知 ({})", event.source_label());
            println!("  标题: {}", event.title);
            println!("  内容: {}", event.content);
            match event.posted_at() {
                Some(ts) => println!("  时间: {}", ts.to_rfc3339()),
                None => println!("  时间: {}", event.timestamp_millis),
            }
        }
        Classification::NoMatch(NoMatchReason::UnrecognizedSource) => {
            println!("非支付通知：来源不是已知支付应用");
        }
        Classification::NoMatch(NoMatchReason::NoKeyword) => {
            println!("非支付通知：未包含支付关键词");
        }
        Classification::Malformed(message) => {
            println!("通知格式错误: {}", message);
        }
    }
    Ok(())
}

async fn watch(config: &MonitorConfig, gate: Arc<dyn PermissionGate>) -> Result<()> {
    let service = NotificationService::from_config(config, Arc::new(ListenerRegistry::new()), gate);
    let sink = Arc::new(JsonLineSink::new(std::io::stdout()));
    let reader = BufReader::new(tokio::io::stdin());

    tokio::select! {
        result = watch_stream(&service, sink, reader) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            service.stop_listening();
            service.on_listener_disconnected();
        }
    }
    Ok(())
}
