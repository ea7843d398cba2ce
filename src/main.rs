use clap::Parser;
use twinsight::cli::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = Config::parse();
    twinsight::cli::run(config).await
}
