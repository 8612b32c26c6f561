mod commands;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bricklane_client::InstructionsClient;

#[derive(Parser)]
#[command(
    name = "bricklane",
    about = "Admin tooling for the Bricklane instructions catalog",
    version
)]
struct Cli {
    /// Base URL of the API server.
    #[arg(
        long,
        env = "BRICKLANE_API_URL",
        default_value = "http://127.0.0.1:3000",
        global = true
    )]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the token for later commands.
    Login {
        #[arg(long)]
        username: Option<String>,
    },
    /// List catalog products.
    Products,
    /// List instructions in a table.
    List {
        /// Only instructions for this product id.
        #[arg(long)]
        product: Option<i32>,
        /// Case-insensitive text filter applied across all columns.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show one instruction.
    Show { id: String },
    /// Create an instruction; prompts for missing fields.
    Create {
        #[arg(long)]
        product: Option<i32>,
        #[arg(long)]
        title: Option<String>,
        /// Path to the PDF manual.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Update title and/or product of an instruction.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        product: Option<i32>,
    },
    /// Replace the PDF of an instruction; uploads immediately.
    ReplaceFile {
        id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete an instruction and its PDF.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut client = InstructionsClient::new(&cli.api_url);
    if let Some(token) = session::load_token()? {
        client.set_token(token);
    }

    match cli.command {
        Command::Login { username } => commands::login(&client, username).await,
        Command::Products => commands::products(&client).await,
        Command::List { product, filter } => commands::list(&client, product, filter).await,
        Command::Show { id } => commands::show(&client, &id).await,
        Command::Create {
            product,
            title,
            file,
        } => commands::create(&client, product, title, file).await,
        Command::Update { id, title, product } => {
            commands::update(&client, &id, title, product).await
        }
        Command::ReplaceFile { id, file } => commands::replace_file(&client, &id, &file).await,
        Command::Delete { id, yes } => commands::delete(&client, &id, yes).await,
    }
}
