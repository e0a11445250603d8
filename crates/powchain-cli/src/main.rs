use anyhow::Result;
use clap::{Parser, Subcommand};
use powchain_core::{constants::DIFFICULTY_BITS, system_clock, Blockchain};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "powchain")]
#[command(about = "Minimal proof-of-work blockchain demo")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an in-memory chain, append the payloads, print every block
    Demo {
        /// Leading zero bits a block hash must have
        #[arg(long, default_value_t = DIFFICULTY_BITS, value_parser = clap::value_parser!(u32).range(1..=255))]
        difficulty_bits: u32,
        /// Emit the chain as JSON instead of the hex listing
        #[arg(long)]
        json: bool,
        /// Block payloads to append, in order
        #[arg(default_values_t = [
            String::from("send 1 bitcoin"),
            String::from("send 1 klaytn"),
        ])]
        data: Vec<String>,
    },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo {
            difficulty_bits,
            json,
            data,
        } => {
            let mut chain = Blockchain::with_config(difficulty_bits, system_clock)?;
            for payload in data {
                chain.append(payload.into_bytes())?;
            }
            info!(blocks = chain.blocks().len(), "demo chain complete");

            if json {
                println!("{}", serde_json::to_string_pretty(chain.blocks())?);
            } else {
                for block in chain.blocks() {
                    println!("Prev. hash: {}", block.prev_hash_hex());
                    println!("Data: {}", String::from_utf8_lossy(block.data()));
                    println!("Hash: {}", block.hash_hex());
                    println!();
                }
            }
        }
    }
    Ok(())
}
