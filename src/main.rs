use clap::Parser;
use limit_desk::cli::{self, output, Cli};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = cli::execute(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
