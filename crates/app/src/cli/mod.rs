use clap::{Parser, Subcommand};

mod db;
mod merchant;

#[derive(Debug, Parser)]
#[command(name = "bazaar-app", about = "Bazaar CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Merchant(merchant::MerchantCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Merchant(command) => merchant::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
