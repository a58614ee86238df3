#[cfg(test)]
mod tests {
    use crate::output::theme::levels_text;
    use crate::output::{discovery_table, print_json, report_table, severity_cell, severity_label};
    use chrono::DateTime;
    use nsxcheck_common::{AgentOutput, NodeOrder, Severity};
    use nsxcheck_engine::{CheckContext, CheckParams, CycleInput, Evaluator, Levels};

    #[test]
    fn print_json_valid() {
        let val = serde_json::json!({"service": "NSX Memory"});
        assert!(print_json(&val).is_ok());
    }

    #[test]
    fn report_table_lists_graded_findings() {
        let mut input = CycleInput::new();
        input.add_output(
            "A",
            &AgentOutput::parse("<<<nsx_loadbalancer>>>\nlb1 id-1 DISABLED False\n"),
        );
        let eval = Evaluator::new(
            CheckContext::new(
                DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
                CheckParams::default(),
            ),
            NodeOrder::ByCollectorId,
        );
        let reports = eval.evaluate(&input, None);

        let rendered = report_table(&reports).to_string();
        assert!(rendered.contains("NSX LoadBalancer lb1"));
        assert!(rendered.contains("[CRIT] is disabled"));
        assert!(rendered.contains("[OK] ID: id-1"));
    }

    #[test]
    fn discovery_table_rows() {
        let rendered =
            discovery_table([("pools", "pool-a", "NSX Pool pool-a")]).to_string();
        assert!(rendered.contains("Kind"));
        assert!(rendered.contains("NSX Pool pool-a"));
    }

    #[test]
    fn severity_cells_render_state() {
        let mut table = comfy_table::Table::new();
        table.add_row(vec![severity_cell(Severity::Crit)]);
        table.add_row(vec![severity_cell(Severity::Unknown)]);
        let rendered = table.to_string();
        assert!(rendered.contains("CRIT"));
        assert!(rendered.contains("UNKNOWN"));
    }

    #[test]
    fn severity_label_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(severity_label(Severity::Warn).to_string(), "WARN");
        colored::control::unset_override();
    }

    #[test]
    fn levels_text_forms() {
        assert_eq!(levels_text(Some(Levels::new(80.0, 90.5))), "warn 80 / crit 90.5");
        assert_eq!(levels_text(None), "no conditions");
    }
}
