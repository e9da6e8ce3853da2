use anyhow::Context;
use clap::Parser;
use sem_planner::utils::error::ErrorSeverity;
use sem_planner::utils::{logger, validation::Validate};
use sem_planner::{build_planner, server, AppConfig};

#[derive(Parser)]
#[command(name = "sem-planner")]
#[command(about = "HTTP service that turns a brand site into a SEM campaign plan")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "sem-planner.toml")]
    config: String,

    /// Override listen host from config
    #[arg(long)]
    host: Option<String>,

    /// Override listen port from config
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match AppConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_server_logger(args.verbose, config.json_logs());

    tracing::info!("🚀 Starting SEM planner service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(e.severity()).max(1));
    }

    tracing::info!("✅ Configuration validated successfully");

    let planner = build_planner(&config).context("failed to build planner")?;

    let host = args
        .host
        .unwrap_or_else(|| config.server_host().to_string());
    let port = args.port.unwrap_or_else(|| config.server_port());

    server::serve(planner, &host, port)
        .await
        .with_context(|| format!("server on {}:{} exited with an error", host, port))?;

    Ok(())
}

// 根據錯誤嚴重程度決定退出碼
fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
