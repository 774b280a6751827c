use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use postmanctl::{
    ApiError, Cli, Command, DescribeError, PostmanClient, build_client, describe,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("\n{} {}\n", "Error:".red().bold(), e);
        print_hints(&e);

        let code = match e.downcast_ref::<DescribeError>() {
            Some(DescribeError::Usage(_)) => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let connection = &cli.connection;
    let api_key = connection
        .api_key
        .as_ref()
        .ok_or_else(|| anyhow!("no API key configured: pass --api-key or set POSTMAN_API_KEY"))?;
    if !api_key.is_postman_key() {
        log::warn!("API key {} does not look like a Postman API key", api_key.masked());
    }

    let http = build_client(api_key, connection.timeout)?;
    let service = PostmanClient::new(http, &connection.api_root)?;

    match &cli.command {
        Command::Describe(cmd) => {
            let out = describe(&service, cmd.kind(), cmd.args(), cmd.print_options()).await?;
            print!("{}", out);
        }
    }
    Ok(())
}

fn print_hints(e: &anyhow::Error) {
    let source = match e.downcast_ref::<DescribeError>() {
        Some(DescribeError::Fetch { source, .. }) => source,
        _ => {
            if e.to_string().contains("no API key") {
                eprintln!("{}", "💡 Suggestion:".yellow());
                eprintln!("   - Generate a key at https://go.postman.co/settings/me/api-keys");
            }
            return;
        }
    };

    match source {
        ApiError::Transport(err) if err.is_timeout() => {
            eprintln!("{}", "💡 Suggestion:".yellow());
            eprintln!("   - Increase timeout with --timeout <seconds>");
            eprintln!("   - Check if the API is reachable");
        }
        ApiError::Transport(err) if err.is_connect() => {
            eprintln!("{}", "💡 Possible causes:".yellow());
            eprintln!("   - Check your network connection");
            eprintln!("   - Check the --api-root URL");
        }
        _ => match source.status() {
            Some(401) | Some(403) => {
                eprintln!("{}", "💡 Possible causes:".yellow());
                eprintln!("   - The API key is invalid or expired");
                eprintln!("   - The key has no access to this resource");
            }
            Some(404) => {
                eprintln!("{}", "💡 Possible causes:".yellow());
                eprintln!("   - Check if the id is correct");
                eprintln!("   - Use the full uid (owner-id) form of the id");
            }
            Some(429) => {
                eprintln!("{}", "💡 Suggestion:".yellow());
                eprintln!("   - Rate limit reached, try again later");
            }
            _ => {}
        },
    }
}
