use bazaar_app::{
    database::{self, Db},
    merchants::{MerchantsService, PgMerchantsService, models::NewMerchant},
};
use clap::{Args, Subcommand};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct MerchantCommand {
    #[command(subcommand)]
    command: MerchantSubcommand,
}

#[derive(Debug, Subcommand)]
enum MerchantSubcommand {
    Create(CreateMerchantArgs),
}

#[derive(Debug, Args)]
struct CreateMerchantArgs {
    /// Merchant display name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional merchant UUID; generated when omitted
    #[arg(long)]
    merchant_uuid: Option<Uuid>,
}

pub(crate) async fn run(command: MerchantCommand) -> Result<(), String> {
    match command.command {
        MerchantSubcommand::Create(args) => create_merchant(args).await,
    }
}

async fn create_merchant(args: CreateMerchantArgs) -> Result<(), String> {
    if args.name.trim().is_empty() {
        return Err("name cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgMerchantsService::new(Db::new(pool));
    let merchant_uuid = args.merchant_uuid.unwrap_or_else(Uuid::now_v7);

    let merchant = service
        .create_merchant(NewMerchant {
            uuid: merchant_uuid.into(),
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create merchant: {error}"))?;

    println!("merchant_uuid: {}", merchant.uuid);
    println!("merchant_name: {}", merchant.name);

    Ok(())
}
