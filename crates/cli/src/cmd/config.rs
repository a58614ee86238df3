use anyhow::Result;
use clap::Subcommand;
use nsxcheck_common::NodeOrder;

use super::helpers;
use crate::output::{print_error, print_json, print_success, theme, OutputMode};

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Print the effective thresholds.
    Show,
    Validate,
    Path,
}

pub fn execute(cmd: ConfigCmd, mode: OutputMode, config_path: Option<String>) -> Result<()> {
    match cmd {
        ConfigCmd::Show => show(mode, config_path),
        ConfigCmd::Validate => validate(mode, config_path),
        ConfigCmd::Path => path(config_path),
    }
}

fn show(mode: OutputMode, config_path: Option<String>) -> Result<()> {
    let cfg = helpers::load_config(config_path.as_deref())?;

    match mode {
        OutputMode::Json => print_json(&cfg)?,
        OutputMode::Human => {
            theme::print_title("Thresholds");
            let order = match cfg.node_order {
                NodeOrder::ByCollectorId => "by collector id",
                NodeOrder::Insertion => "insertion",
            };
            theme::print_setting("Node order", order);
            theme::print_levels("Backup age (s)", cfg.backups.age_levels_upper);
            theme::print_levels("Cert days left", cfg.certificates.age_levels);
            theme::print_levels("RAM used (%)", cfg.memory.levels);
            theme::print_levels("Load per core", cfg.cpu.load_levels);
        }
    }

    Ok(())
}

fn validate(mode: OutputMode, config_path: Option<String>) -> Result<()> {
    match helpers::load_config(config_path.as_deref()) {
        Ok(_cfg) => match mode {
            OutputMode::Json => {
                print_json(&serde_json::json!({"valid": true}))?;
            }
            OutputMode::Human => print_success("Configuration is valid"),
        },
        Err(e) => match mode {
            OutputMode::Json => {
                print_json(&serde_json::json!({"valid": false, "error": format!("{e:#}")}))?;
            }
            OutputMode::Human => print_error(&format!("Invalid configuration: {e:#}")),
        },
    }

    Ok(())
}

fn path(config_path: Option<String>) -> Result<()> {
    let p = config_path
        .map(std::path::PathBuf::from)
        .unwrap_or_else(helpers::default_config_path);

    println!("{}", p.display());
    Ok(())
}
