//! waypoint-codec command-line tool.
//!
//! - `encode`: read one plain JSON message on stdin, print its wire form
//! - `decode`: read a wire payload on stdin (object, array or envelope),
//!   print the decoded messages as one pretty JSON array

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use waypoint_codec::types::ENV_ENCRYPTION_KEY;
use waypoint_codec::{Codec, Config};

#[derive(Debug, Parser)]
#[command(name = "waypoint-codec", version, about = "Encode and decode location messages")]
struct Cli {
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Payload encryption passphrase.
    #[arg(long, global = true, env = ENV_ENCRYPTION_KEY, hide_env_values = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode one message from stdin.
    Encode {
        /// Print indented plaintext JSON instead of the wire form.
        #[arg(long)]
        pretty: bool,
    },
    /// Decode a payload from stdin.
    Decode,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    }
    .apply_env()?;
    if let Some(key) = cli.key {
        config.encryption.key = Some(key);
    }

    waypoint_codec::observability::init_tracing_from(&config.observability);
    let codec = Codec::from_config(&config);
    tracing::debug!(?codec, "codec ready");

    match cli.command {
        Command::Encode { pretty } => {
            let input = codec.read_input_async(tokio::io::stdin()).await?;
            let message = codec.decode_unencrypted(&input)?;
            let output = if pretty {
                codec.encode_plain_pretty(&message)?
            } else {
                codec.encode(&message)?
            };
            println!("{}", output);
        }
        Command::Decode => {
            let messages = codec.decode_sequence_async(tokio::io::stdin()).await?;
            tracing::info!(count = messages.len(), "decoded payload");
            println!("{}", codec.encode_plain_pretty_batch(&messages)?);
        }
    }

    Ok(())
}
