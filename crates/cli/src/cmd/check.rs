use anyhow::Result;
use nsxcheck_common::{EntityKind, Severity};
use nsxcheck_engine::{Evaluator, ServiceReport};

use super::helpers::{self, NodeSource};
use crate::output::{print_json, print_warning, report_table, theme, OutputMode};

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Collector output as `name=path`; repeat once per node.
    #[arg(long = "node", required = true, value_parser = helpers::parse_node_arg)]
    pub nodes: Vec<NodeSource>,

    /// Restrict to these entity kinds.
    #[arg(long = "kind")]
    pub kinds: Vec<EntityKind>,

    /// Evaluation time as epoch seconds (default: now).
    #[arg(long)]
    pub now: Option<i64>,
}

pub fn execute(args: CheckArgs, mode: OutputMode, config_path: Option<String>) -> Result<()> {
    let cfg = helpers::load_config(config_path.as_deref())?;
    let input = helpers::load_input(&args.nodes)?;
    let now = helpers::resolve_now(args.now)?;

    let evaluator = Evaluator::from_config(&cfg, now);
    let reports = evaluator.evaluate(&input, helpers::kind_filter(&args.kinds));

    match mode {
        OutputMode::Json => print_json(&reports)?,
        OutputMode::Human => {
            for (collector, kind, err) in input.parse_errors() {
                print_warning(&format!("{collector} {kind}: {err}"));
            }
            print_reports(&reports);
        }
    }
    Ok(())
}

fn print_reports(reports: &[ServiceReport]) {
    if !reports.is_empty() {
        println!("{}", report_table(reports));
    }
    let worst = reports.iter().map(|r| r.state).reduce(Severity::worst);
    theme::print_summary(reports.len(), worst);
}
