use clap::Parser;
use ot_wasm_load::config::LogFormat;
use ot_wasm_load::utils::error::ErrorSeverity;
use ot_wasm_load::utils::{logger, validation::Validate};
use ot_wasm_load::{
    CliConfig, ConsoleNotifier, DefaultFetcher, Launcher, RunOutcome, WasmtimeCapability,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting ot-wasm-load");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 解析並驗證配置
    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    let location = config.location()?;

    let capability = if config.disable_engine {
        tracing::info!("WebAssembly engine disabled by configuration");
        None
    } else {
        // 建不出引擎的主機一樣走 unsupported 分支
        match WasmtimeCapability::try_new() {
            Ok(capability) => Some(capability.require_wasm_mime(config.require_wasm_mime)),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    };

    let launcher = Launcher::new(
        capability,
        DefaultFetcher::new(),
        ConsoleNotifier::new(config.acknowledge),
        location,
    )
    .with_argument(config.argument)
    .with_failure_policy(config.failure_policy)
    .with_monitoring(config.monitor);

    match launcher.run().await {
        RunOutcome::Succeeded(_) | RunOutcome::Unsupported => {}
        RunOutcome::Failed(e) => {
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
