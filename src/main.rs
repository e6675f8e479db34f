use gridportal::app::AppBuilder;

#[tokio::main]
async fn main() {
    let mut builder = AppBuilder::new();
    if let Err(err) = builder.use_logging() {
        eprintln!("logging initialize failed: {}", err.description());
        for warning in builder.warnings() {
            eprintln!("config: {}", warning);
        }
        std::process::exit(1);
    }

    tracing::info!("{} {} ({})", builder.settings().name, gridportal::VERSION, gridportal::COMMIT_BUILD);

    let served = match builder.build() {
        Ok(app) => app.run().await,
        Err(err) => Err(err),
    };

    if let Err(err) = served {
        tracing::error!("portal stopped: {}", err.description());
        std::process::exit(1);
    }
}
