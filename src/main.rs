use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = ssoprof::cli::Cli::parse();

    if let Err(err) = ssoprof::run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
