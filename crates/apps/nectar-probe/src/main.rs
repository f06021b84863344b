//! Diagnostic probe for a running Nectar server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;

use nectar_client::{Client, ClientOptions};

#[derive(Parser, Debug)]
#[command(name = "nectar-probe", about = "Poke a running Nectar server")]
struct Args {
    /// WebSocket endpoint of the server.
    #[arg(long, default_value = "ws://127.0.0.1:45167")]
    url: String,
    /// Connect token printed by the server at startup.
    #[arg(long)]
    token: Option<String>,
    /// Per-call deadline in seconds (0 waits forever).
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Issue one call and print the reply as JSON.
    Call {
        /// Dotted method name, e.g. `os.getPath`.
        method: String,
        /// JSON argument object.
        args: Option<String>,
    },
    /// Print pushed events until interrupted. With no name, prints all.
    Listen { event: Option<String> },
    /// Print the runtime snapshot.
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut options = ClientOptions::new(&args.url);
    if let Some(token) = &args.token {
        options = options.auth_token(token);
    }
    if args.timeout_secs > 0 {
        options = options.call_timeout(Duration::from_secs(args.timeout_secs));
    }

    let client = Client::connect(options)
        .await
        .with_context(|| format!("connecting to {}", args.url))?;

    match args.command {
        Command::Call { method, args: call_args } => {
            let data: JsonValue = match call_args {
                Some(text) => serde_json::from_str(&text).context("parsing call arguments")?,
                None => JsonValue::Null,
            };
            let reply = client.call(&method, data).await?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        Command::Listen { event } => {
            listen(&client, event).await?;
        }
        Command::Info => {
            println!("{}", serde_json::to_string_pretty(client.runtime())?);
        }
    }
    Ok(())
}

async fn listen(client: &Client, event: Option<String>) -> anyhow::Result<()> {
    // No wildcard subscription exists on the wire; with no name given,
    // watch the well-known housekeeping events.
    let names: Vec<String> = match event {
        Some(name) => vec![name],
        None => ["offline", "windowClose", "serverRestart"]
            .into_iter()
            .map(String::from)
            .collect(),
    };
    if names.iter().any(|n| n.trim().is_empty()) {
        bail!("event name must not be empty");
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    for name in &names {
        let tx = tx.clone();
        let tag = name.clone();
        client.events().on(
            name,
            Arc::new(move |data| {
                let _ = tx.send((tag.clone(), data));
            }),
        );
    }
    log::info!("listening for {names:?} (Ctrl-C to stop)");

    loop {
        tokio::select! {
            delivered = rx.recv() => match delivered {
                Some((tag, data)) => println!("{tag}: {data}"),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}
