use stockkeeper_app::{AppConfig, Shell};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    stockkeeper_observability::init(config.log_format);

    for warning in &config.warnings {
        tracing::warn!("{warning}; using default");
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), config.time);

    tracing::info!("stock tracker started");
    shell.run()
}
