// SPDX-FileCopyrightText: 2026 Keyfold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyfold - a zero-knowledge password-manager backend.
//!
//! This is the binary entry point for the Keyfold server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Keyfold - a zero-knowledge password-manager backend.
#[derive(Parser, Debug)]
#[command(name = "keyfold", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Keyfold API server.
    Serve,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match keyfold_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            keyfold_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("keyfold serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            match toml_render(&config) {
                Ok(rendered) => println!("{rendered}"),
                Err(e) => {
                    eprintln!("keyfold config: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("keyfold: use --help for available commands");
        }
    }
}

fn toml_render(config: &keyfold_config::model::KeyfoldConfig) -> Result<String, String> {
    // Redact the signing secret before printing.
    let mut shown = config.clone();
    if shown.auth.token_secret.is_some() {
        shown.auth.token_secret = Some("[redacted]".to_string());
    }
    toml::to_string_pretty(&shown).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn config_render_redacts_the_secret() {
        let mut config = keyfold_config::model::KeyfoldConfig::default();
        config.auth.token_secret = Some("0123456789abcdef0123456789abcdef".to_string());
        let rendered = super::toml_render(&config).unwrap();
        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("0123456789abcdef"));
    }
}
