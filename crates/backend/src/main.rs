#![deny(warnings)]

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Command};
use logging::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log = DEFAULT.new(o!("function" => "main"));
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { model, bind } => {
            let model = commands::load_model(&cli::model_path(model.as_ref())?)?;
            let addr = cli::bind_addr(bind.as_deref())?;
            info!(log, "starting server"; "addr" => addr.as_str());
            commands::serve(model, &addr).await?;
        }
        Command::Predict {
            location,
            bedrooms,
            listing_type,
            model,
        } => {
            let model = commands::load_model(&cli::model_path(model.as_ref())?)?;
            let report = commands::predict(&model, &location, bedrooms, listing_type)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Validate { model } => {
            let path = cli::model_path(model.as_ref())?;
            let model = commands::load_model(&path)?;
            let report = commands::describe(&model);
            println!("{}: ok", path.display());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
