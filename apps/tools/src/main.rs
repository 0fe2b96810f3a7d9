use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::protocol::{sign_batch_route, SignBatchRequest, SignBatchResponse};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:8788")]
    gateway_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request signed download links for storage object paths.
    Sign {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(long)]
        bucket: Option<String>,
        #[arg(long)]
        expires_in: Option<u64>,
    },
    /// Check that the gateway answers.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let base = cli.gateway_url.trim_end_matches('/').to_string();
    let http = reqwest::Client::new();

    match cli.command {
        Command::Sign {
            paths,
            bucket,
            expires_in,
        } => {
            let request = SignBatchRequest {
                paths,
                bucket,
                expires_in,
            };
            let response: SignBatchResponse = http
                .post(format!("{base}{}", sign_batch_route()))
                .json(&request)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            for result in response.results {
                match (result.url, result.error) {
                    (Some(url), _) => println!("{} -> {url}", result.path),
                    (None, Some(error)) => println!("{}: {error}", result.path),
                    (None, None) => println!("{}: no result returned", result.path),
                }
            }
        }
        Command::Health => {
            let status = http.get(format!("{base}/healthz")).send().await?.status();
            println!("gateway {base} answered {status}");
        }
    }

    Ok(())
}
