use clap::Parser;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli::run(cli).await {
        eprintln!("{} {e}", console::style("error:").red().bold());
        std::process::exit(e.exit_code());
    }
}
