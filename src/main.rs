//! tls-pem-loader - load and verify TLS material from PEM files
//!
//! This tool provides functionality for:
//! - Collecting trusted certificates from a file or directory tree
//! - Loading a certificate and private key, decrypting the key when needed
//! - Checking that the key belongs to the certificate

use clap::Parser;
use console::style;
use tls_pem_loader::cert_ops::collect_certificates;
use tls_pem_loader::cli::{CertsArgs, Cli, Commands, KeyPairArgs};
use tls_pem_loader::config::TlsConfig;
use tls_pem_loader::utils::output::{self, KeyPairSummary};
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Handle color preference
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Certs(args) => run_certs(&args, cli.json),
        Commands::Keypair(args) => run_key_pair(&args, cli.json),
    }
}

fn run_certs(args: &CertsArgs, json: bool) -> anyhow::Result<()> {
    let certs = collect_certificates(&args.path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&certs)?);
    } else {
        output::print_certificates(&args.path, &certs);
    }

    Ok(())
}

fn run_key_pair(args: &KeyPairArgs, json: bool) -> anyhow::Result<()> {
    let config = resolve_config(args)?;
    let pair = config.load_key_pair()?;
    let summary = KeyPairSummary::new(&pair, pair.leaf()?);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        output::print_key_pair(&summary);
    }

    Ok(())
}

/// Merge the optional config file with flags; flags win.
fn resolve_config(args: &KeyPairArgs) -> anyhow::Result<TlsConfig> {
    let mut config = match &args.config {
        Some(path) => TlsConfig::load_from_file(path)?,
        None => TlsConfig::default(),
    };

    if let Some(cert) = &args.cert {
        config.cert = cert.clone();
    }
    if let Some(key) = &args.key {
        config.key = key.clone();
    }
    if let Some(pass_phrase) = &args.pass_phrase {
        config.pass_phrase = pass_phrase.clone();
    }

    Ok(config)
}
