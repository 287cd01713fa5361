//! uoinject replay
//!
//! Feeds a captured client/server conversation through the engine and
//! prints, for every message, whether it would be forwarded and what the
//! engine injected in its place.
//!
//! ```text
//! uoinject-replay <capture> [config]
//! ```

mod capture;

use anyhow::{bail, Context};
use capture::{Entry, Origin};
use std::sync::Arc;
use tracing::info;
use uoinject_config::ConfigManager;
use uoinject_core::EncryptionMode;
use uoinject_engine::{message_type, Engine, Interceptor};

fn hex(buf: &[u8]) -> String {
    buf.iter().map(|byte| format!("{:02x}", byte)).collect::<Vec<_>>().join(" ")
}

fn message_name(buf: &[u8]) -> &'static str {
    buf.first()
        .and_then(|&opcode| message_type(opcode))
        .map_or("?", |entry| entry.name)
}

/// Interceptor standing in for the real proxy: prints what it is asked to do
struct PrintingInterceptor;

impl Interceptor for PrintingInterceptor {
    fn send_server(&mut self, buf: &[u8]) {
        println!("    inject => server  {:<24} {}", message_name(buf), hex(buf));
    }

    fn send_client(&mut self, buf: &[u8]) {
        println!("    inject => client  {:<24} {}", message_name(buf), hex(buf));
    }

    fn set_compressed(&mut self, compressed: bool) {
        println!("    compression {}", if compressed { "on" } else { "off" });
    }

    fn set_login_encryption(&mut self, key1: u32, key2: u32) {
        println!("    login keys {:08x} {:08x}", key1, key2);
    }

    fn set_game_encryption(&mut self, mode: EncryptionMode) {
        println!("    game encryption {}", mode.as_str());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(capture_path) = args.next() else {
        bail!("usage: uoinject-replay <capture> [config]");
    };
    let config = match args.next() {
        Some(path) => ConfigManager::load_from_file(&path).with_context(|| format!("loading config {}", path))?,
        None => ConfigManager::new(),
    };

    let text = tokio::fs::read_to_string(&capture_path)
        .await
        .with_context(|| format!("reading capture {}", capture_path))?;
    let entries = capture::parse_capture(&text)?;
    info!("Replaying {} entries from {}", entries.len(), capture_path);

    let mut engine = Engine::new(Arc::new(config), Box::new(PrintingInterceptor), Box::new(()));
    for entry in entries {
        match entry {
            Entry::Message { origin, mut bytes } => {
                let arrow = match origin {
                    Origin::Client => "C>",
                    Origin::Server => "S>",
                };
                println!("{} {:<24} {}", arrow, message_name(&bytes), hex(&bytes));
                let forward = match origin {
                    Origin::Client => engine.on_outbound_message(&mut bytes),
                    Origin::Server => engine.on_inbound_message(&mut bytes),
                };
                println!("    {}", if forward { "forwarded" } else { "suppressed" });
            }
            Entry::Command(text) => {
                println!("!  {}", text);
                engine.run_command(&text);
            }
            Entry::Disconnect => {
                println!("-- disconnect");
                engine.disconnected();
            }
        }
    }

    let stats = engine.stats();
    info!(
        "Done: {} forwarded, {} suppressed, {} unknown, {} direction mismatches, {} size mismatches",
        stats.forwarded, stats.suppressed, stats.unknown_opcode, stats.direction_mismatch, stats.size_mismatch
    );
    Ok(())
}
