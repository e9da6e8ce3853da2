use clap::Parser;
use sem_planner::config::inputs::load_inputs;
use sem_planner::domain::model::SemInputs;
use sem_planner::utils::error::ErrorSeverity;
use sem_planner::utils::{logger, validation::Validate};
use sem_planner::{build_planner, AppConfig, BatchRunner, LocalStorage, PlanExporter};

#[derive(Parser)]
#[command(name = "sem-batch")]
#[command(about = "Generate a SEM plan from a TOML/JSON input file and export it")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "sem-planner.toml")]
    config: String,

    /// Path to plan inputs (.toml or .json)
    #[arg(short, long, default_value = "sem-inputs.toml")]
    input: String,

    /// Override output directory from config
    #[arg(short, long)]
    output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable system monitoring
    #[arg(long)]
    monitor: bool,

    /// Dry run - show what would be requested without calling any API
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting SEM batch planner");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match AppConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(output) = &args.output {
        let mut batch = config.batch();
        batch.output_path = Some(output.clone());
        config.batch = Some(batch);
        tracing::info!("🔧 Output path overridden to: {}", output);
    }

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let inputs = match load_inputs(&args.input) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("❌ Failed to load inputs '{}': {}", args.input, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = inputs.validate() {
        fail(&e);
    }

    tracing::info!("✅ Configuration and inputs validated successfully");

    display_config_summary(&config, &inputs, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config, &inputs)?;
        return Ok(());
    }

    if args.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let planner = build_planner(&config)?;
    let batch = config.batch();
    let storage = LocalStorage::new(batch.output_path().to_string());
    let exporter = PlanExporter::new(storage, batch.clone());
    let runner = BatchRunner::new_with_monitoring(planner, exporter, args.monitor);

    match runner.run(&inputs).await {
        Ok(report) => {
            tracing::info!("✅ SEM plan completed successfully!");
            println!("✅ SEM plan completed successfully!");
            println!(
                "📊 {} keywords, {} total volume, avg CPC {:.2}",
                report.plan.total_keywords, report.plan.total_volume, report.plan.avg_cpc
            );
            for file in &report.written {
                println!("📁 Output saved to: {}/{}", batch.output_path(), file);
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn fail(e: &sem_planner::PlanError) -> ! {
    tracing::error!(
        "❌ SEM plan failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼，失敗時至少為 1
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn display_config_summary(config: &AppConfig, inputs: &SemInputs, args: &Args) {
    let batch = config.batch();
    let context = config.plan_context();

    println!("📋 Configuration Summary:");
    println!("  Keyword Planner: {}", config.keyword_planner.endpoint);
    println!("  Customer: {}", config.keyword_planner.customer_id);
    println!("  Text Generation: {}", config.text_generation_enabled());
    println!("  Min Search Volume: {}", context.min_search_volume);
    println!("  Conversion Rate: {}", context.conversion_rate);
    println!("  Brand: {}", inputs.brand_website);
    if let Some(competitor) = &inputs.competitor_website {
        println!("  Competitor: {}", competitor);
    }
    println!("  Locations: {}", inputs.locations().join(", "));
    println!("  Total Budget: {}", inputs.budget_allocations.total());
    println!("  Output: {}", batch.output_path());
    println!("  Formats: {}", batch.output_formats().join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &AppConfig, inputs: &SemInputs) -> Result<(), Box<dyn std::error::Error>> {
    let context = config.plan_context();
    let batch = config.batch();

    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Keyword Ideas Request:");
    println!(
        "  POST {}/customers/{}:generateKeywordIdeas",
        config.keyword_planner.endpoint.trim_end_matches('/'),
        config.keyword_planner.customer_id
    );
    println!("  Seed URL: {}", inputs.seed_url().unwrap_or("-"));
    let seeds = inputs.seed_themes();
    if seeds.is_empty() {
        println!("  Seed Keywords: none");
    } else {
        println!("  Seed Keywords: {}", seeds.join(", "));
    }
    println!("  Language: {}", context.language_id);
    println!("  Geo Targets: {} configured", context.geo_target_ids.len());

    println!();
    println!("🧠 Theme Synthesis:");
    match &config.text_generation {
        Some(text) if text.has_api_key() => println!("  Model: {}", text.model()),
        _ => println!("  Fallback rules only (no API key)"),
    }

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", batch.output_path());
    println!("  Formats: {}", batch.output_formats().join(", "));
    if let Some(archive) = batch.archive_name() {
        println!("  Compression: {} (ZIP)", archive);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
