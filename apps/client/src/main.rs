mod api_client;
mod board;
mod config;
mod errors;
mod models;
mod ui;

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::BackendClient;
use crate::board::JobBoard;
use crate::config::Config;
use crate::errors::alert;
use crate::ui::render::render;
use crate::ui::{dispatch, Command, HELP};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so they never interleave with the rendered board on stdout
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting TalentMatch client v{}", env!("CARGO_PKG_VERSION"));

    let client = BackendClient::new(&config)?;
    info!("Backend: {}", client.base_url());

    let mut board = JobBoard::new(Arc::new(client), &config);

    if let Err(e) = board.load_jobs().await {
        show_alert(&alert("Error fetching jobs", &e));
    }
    println!("{}", render(&board));
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(msg) => {
                println!("{msg}\n\n{HELP}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            command => {
                let label = format!("{command:?}");
                match dispatch(&mut board, command).await {
                    Ok(Some(note)) => println!("{note}"),
                    Ok(None) => {}
                    Err(e) => show_alert(&alert(&label, &e)),
                }
            }
        }

        println!("{}", render(&board));
    }

    info!("Goodbye");
    Ok(())
}

fn show_alert(text: &str) {
    println!("\n⚠  {text}\n");
}
