//! ct-cli - browse and add city temperature records in a remote store.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ct-cli",
    version,
    about = "City temperatures grouped into hot, warm and cool bands"
)]
struct Cli {
    #[command(flatten)]
    store: ct_cmd::StoreArgs,

    #[command(subcommand)]
    command: ct_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Starting ct-cli against {}", cli.store.base_url);
    ct_cmd::run(&cli.store, cli.command).await
}
