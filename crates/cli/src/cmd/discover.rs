use anyhow::Result;
use nsxcheck_common::EntityKind;
use nsxcheck_engine::discover;
use serde::Serialize;

use super::helpers::{self, NodeSource};
use crate::output::{discovery_table, print_json, theme, OutputMode};

#[derive(clap::Args)]
pub struct DiscoverArgs {
    /// Collector output as `name=path`; repeat once per node.
    #[arg(long = "node", required = true, value_parser = helpers::parse_node_arg)]
    pub nodes: Vec<NodeSource>,

    /// Restrict to these entity kinds.
    #[arg(long = "kind")]
    pub kinds: Vec<EntityKind>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DiscoveredItem {
    pub kind: EntityKind,
    pub item: String,
    pub service: String,
}

pub fn execute(args: DiscoverArgs, mode: OutputMode, config_path: Option<String>) -> Result<()> {
    let cfg = helpers::load_config(config_path.as_deref())?;
    let input = helpers::load_input(&args.nodes)?;
    let only = helpers::kind_filter(&args.kinds);

    let items: Vec<DiscoveredItem> = input
        .kinds()
        .filter(|k| only.map_or(true, |o| o.contains(k)))
        .filter_map(|kind| input.get(kind).map(|multi| (kind, multi)))
        .flat_map(|(kind, multi)| {
            discover(multi, cfg.node_order)
                .into_iter()
                .map(move |item| DiscoveredItem {
                    kind,
                    service: kind.service_name(&item),
                    item,
                })
        })
        .collect();

    match mode {
        OutputMode::Json => print_json(&items)?,
        OutputMode::Human => {
            if items.is_empty() {
                theme::print_note("Nothing discovered.");
                return Ok(());
            }
            let rows = items
                .iter()
                .map(|i| (i.kind.as_str(), i.item.as_str(), i.service.as_str()));
            println!("{}", discovery_table(rows));
        }
    }
    Ok(())
}
