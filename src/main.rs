mod actions;
mod app;
mod capture;
mod clipboard;
mod commands;
mod config;
mod history;
mod logging;
mod session;
mod transcription;

use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = app::run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
