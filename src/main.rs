use clap::Parser;
use lucidshark::app::cli::Args;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let code = lucidshark::app::startup::run(args).await;
    std::process::exit(code);
}
