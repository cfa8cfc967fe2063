//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tls-pem-loader")]
#[command(version)]
#[command(about = "Load and verify TLS certificates and key pairs from PEM files", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect every certificate under a file or directory
    Certs(CertsArgs),

    /// Load a certificate and private key and check that they match
    Keypair(KeyPairArgs),
}

#[derive(Args, Debug)]
pub struct CertsArgs {
    /// File or directory to collect certificates from
    #[arg(required = true)]
    pub path: String,
}

#[derive(Args, Debug)]
pub struct KeyPairArgs {
    /// Certificate PEM file
    #[arg(long, required_unless_present = "config")]
    pub cert: Option<String>,

    /// Private key PEM file
    #[arg(long, required_unless_present = "config")]
    pub key: Option<String>,

    /// Pass-phrase for an encrypted private key
    #[arg(long, env = "TLS_KEY_PASS_PHRASE", hide_env_values = true)]
    pub pass_phrase: Option<String>,

    /// TOML file holding cert, key and passPhrase
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_certs() {
        let cli = Cli::try_parse_from(["tls-pem-loader", "certs", "/certs", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Certs(args) => assert_eq!(args.path, "/certs"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_keypair_needs_paths_or_config() {
        assert!(Cli::try_parse_from(["tls-pem-loader", "keypair"]).is_err());
        assert!(
            Cli::try_parse_from(["tls-pem-loader", "keypair", "--config", "tls.toml"]).is_ok()
        );
    }

    #[test]
    fn test_parse_keypair() {
        let cli = Cli::try_parse_from([
            "tls-pem-loader",
            "keypair",
            "--cert",
            "test.crt",
            "--key",
            "test_rsa",
            "--pass-phrase",
            "testing",
        ])
        .unwrap();

        match cli.command {
            Commands::Keypair(args) => {
                assert_eq!(args.cert.as_deref(), Some("test.crt"));
                assert_eq!(args.key.as_deref(), Some("test_rsa"));
                assert_eq!(args.pass_phrase.as_deref(), Some("testing"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
