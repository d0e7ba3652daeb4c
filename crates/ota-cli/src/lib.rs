//! ota - over-the-air mobile app distribution
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Serves signed mobile app packages straight from a web server so a
//! browser can install them without an app store.
//!
//! # Overview
//!
//! Drop `.ipa` and `.apk` files into the artifact store and run `ota serve`.
//! The `/downloads` page lists them; iOS entries link to an `itms-services`
//! URI that makes the OS fetch a generated manifest from `/api/manifest`,
//! which in turn points at the package under `/downloads/<file>`.
//!
//! # Directory Layout
//!
//! ```text
//! ./
//! ├── ota.toml            # Optional configuration
//! └── public/downloads/   # Flat artifact store
//!     ├── Provider.ipa
//!     └── provider.apk
//! ```

pub mod cmd;
pub mod server;
pub mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ota_core::OtaConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ota")]
#[command(author, version, about = "ota - over-the-air mobile app distribution")]
pub struct Cli {
    /// Path to an ota.toml configuration file
    #[arg(long, global = true, env = "OTA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Artifact store directory (overrides config)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the downloads page, manifests and artifacts over HTTP
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:3000
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// List artifacts in the store
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the install manifest for an artifact
    Manifest(ManifestArgs),
    /// Print install links for every iOS artifact
    Link {
        /// Public base URL clients use, e.g. https://abc.ngrok.app
        #[arg(long)]
        base_url: String,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, clap::Args)]
pub struct ManifestArgs {
    /// Artifact filename in the store
    pub file: String,
    /// Public base URL clients use, e.g. https://abc.ngrok.app
    #[arg(long)]
    pub base_url: String,
    /// Bundle identifier (must match the signed .ipa)
    #[arg(long)]
    pub bundle_id: Option<String>,
    /// Bundle version
    #[arg(long = "bundle-version")]
    pub version: Option<String>,
    /// Install prompt title
    #[arg(long)]
    pub title: Option<String>,
}

impl Cli {
    /// Load configuration and apply command-line overrides.
    pub fn load_config(&self) -> Result<OtaConfig> {
        let mut config =
            OtaConfig::load(self.config.as_deref()).context("Failed to load configuration")?;
        if let Some(store) = &self.store {
            config.store_dir.clone_from(store);
        }
        if let Commands::Serve { bind: Some(bind) } = &self.command {
            config.bind = *bind;
        }
        Ok(config)
    }
}
