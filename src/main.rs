use clap::Parser;
use docs_askbot::cli::Args;
use docs_askbot::logging::init_logger;
use dotenv::dotenv;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    let args = Args::parse();
    init_logger(&args.log_level);

    docs_askbot::run(args).await
}
