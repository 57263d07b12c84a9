pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(about = "Sentinel CLI - database setup and bootstrap for Sentinel Admin")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply database migrations")]
    Migrate,

    #[command(about = "Insert every catalogued privilege that is missing")]
    Seed,

    #[command(about = "Create a role holding every privilege and an account with that role")]
    Bootstrap {
        #[arg(long, default_value = "Administrators")]
        role: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,
    },

    #[command(about = "Print a signed bearer token for an account")]
    Token {
        account_id: Uuid,
    },

    #[command(about = "List roles and their privilege counts")]
    Roles,
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::migrate(output_format).await,
        Commands::Seed => commands::seed(output_format).await,
        Commands::Bootstrap {
            role,
            username,
            email,
        } => commands::bootstrap(&role, &username, &email, output_format).await,
        Commands::Token { account_id } => commands::token(account_id, output_format).await,
        Commands::Roles => commands::roles(output_format).await,
    }
}
