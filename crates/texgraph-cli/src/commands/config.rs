//! Settings file inspection command.

use std::path::PathBuf;

use clap::Args;
use texgraph_config::Settings;

use super::common::load_settings;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the default settings if the file does not exist yet
    #[arg(long)]
    init: bool,

    /// Settings file (default: user settings)
    #[arg(long)]
    settings: Option<PathBuf>,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let (settings, path) = load_settings(args.settings.as_deref())?;

    if args.init {
        if path.exists() {
            println!("Settings already exist at {}", path.display());
        } else {
            Settings::default().save(&path)?;
            println!("Wrote default settings to {}", path.display());
        }
        return Ok(());
    }

    println!("# {}", path.display());
    if !path.exists() {
        println!("# (file not found, showing defaults)");
    }
    print!("{}", settings.to_toml()?);
    println!();
    println!("# default size: {}", settings.canvas.default_size());
    Ok(())
}
