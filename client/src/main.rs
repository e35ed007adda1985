use anyhow::Context;
use clap::{Parser, Subcommand};
use common::Codec;
use memo_client::MemoClient;

#[derive(Parser)]
#[command(version, about = "Command-line client for memo.MemoService")]
struct Cli {
    #[arg(long, env = "MEMO_SERVER_URL", default_value = "http://localhost:50051")]
    url: String,

    /// Send binary protobuf instead of JSON
    #[arg(long)]
    proto: bool,

    /// Speak cleartext HTTP/2 without upgrade
    #[arg(long)]
    http2: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every memo of an owner
    List {
        #[arg(long)]
        owner: String,
    },
    Get {
        #[arg(long)]
        owner: String,
        id: String,
    },
    Create {
        #[arg(long)]
        user: String,
        content: String,
    },
    /// Replace the content of a memo
    Update {
        #[arg(long)]
        user: String,
        id: String,
        content: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut http = reqwest::Client::builder();
    if cli.http2 {
        http = http.http2_prior_knowledge();
    }
    let client = MemoClient::new(cli.url)
        .with_codec(if cli.proto { Codec::Proto } else { Codec::Json })
        .with_http_client(http.build().context("could not build the HTTP client")?);

    let output = match cli.command {
        Command::List { owner } => serde_json::to_string_pretty(&client.list_memos(&owner).await?)?,
        Command::Get { owner, id } => {
            serde_json::to_string_pretty(&client.get_memo(&owner, &id).await?)?
        }
        Command::Create { user, content } => {
            serde_json::to_string_pretty(&client.create_memo(&user, &content).await?)?
        }
        Command::Update { user, id, content } => {
            serde_json::to_string_pretty(&client.update_memo(&id, &user, &content).await?)?
        }
    };
    println!("{output}");

    Ok(())
}
