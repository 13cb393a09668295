use anyhow::Context;
use clap::{Parser, Subcommand};
use common::config;
use common::types::ListingType;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "estate-backend", about = "Nairobi property price service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load the model and serve the HTTP API
    Serve {
        /// Model artifact (defaults to MODEL_PATH)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Listen address (defaults to WEB_BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Predict one price and print it as JSON
    Predict {
        /// Location slug, e.g. kilimani
        #[arg(long)]
        location: String,

        #[arg(long)]
        bedrooms: u32,

        /// Sale or Rent
        #[arg(long = "type")]
        listing_type: ListingType,

        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Check a model artifact and print what it contains
    Validate {
        #[arg(long)]
        model: Option<PathBuf>,
    },
}

/// 引数で指定がなければ設定の MODEL_PATH を使う
pub fn model_path(arg: Option<&PathBuf>) -> anyhow::Result<PathBuf> {
    match arg {
        Some(path) => Ok(path.clone()),
        None => config::get("MODEL_PATH")
            .map(PathBuf::from)
            .context("no model path given"),
    }
}

pub fn bind_addr(arg: Option<&str>) -> anyhow::Result<String> {
    match arg {
        Some(addr) => Ok(addr.to_owned()),
        None => config::get("WEB_BIND_ADDR"),
    }
}
