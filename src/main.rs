use car_inventory::utils::error::ErrorSeverity;
use car_inventory::utils::{logger, validation::Validate};
use car_inventory::{CliConfig, InventoryError, LocalStorage, Menu, Persistence};
use clap::Parser;

fn exit_code(err: &InventoryError) -> i32 {
    match err.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(err: InventoryError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        err,
        err.category(),
        err.severity()
    );
    eprintln!("❌ {}", err.user_friendly_message());
    eprintln!("💡 {}", err.recovery_suggestion());
    std::process::exit(exit_code(&err).max(1));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    // 載入並驗證配置
    let settings = match config.load_settings() {
        Ok(settings) => settings,
        Err(e) => fail(e),
    };
    if let Err(e) = settings.validate() {
        fail(e);
    }
    tracing::info!(
        "Working in {} (duplicates: {:?})",
        settings.directory,
        settings.duplicate_policy
    );

    let persistence = Persistence::new(LocalStorage::new(&settings.directory));
    let stdin = std::io::stdin();
    let mut menu = Menu::new(
        stdin.lock(),
        std::io::stdout(),
        persistence,
        settings.duplicate_policy,
    );

    if let Err(e) = menu.run().await {
        let code = exit_code(&e);
        tracing::error!("Menu stopped: {}", e);
        if code > 0 {
            return Err(e.into());
        }
    }

    Ok(())
}
