use chrono::{DateTime, Duration, Utc};

use nsxcheck_common::{AgentOutput, EntityKind, NodeOrder, RawPayload, Severity};
use nsxcheck_engine::reconcile::DIVERGENCE_SUMMARY;
use nsxcheck_engine::{
    load_from_str, CheckContext, CheckParams, CycleInput, Evaluator, Levels, ThresholdSpec,
};

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn evaluator(now: DateTime<Utc>, params: CheckParams) -> Evaluator {
    Evaluator::new(CheckContext::new(now, params), NodeOrder::ByCollectorId)
}

#[test]
fn failed_backup_without_levels() {
    let mut input = CycleInput::new();
    input.add_payload(
        "collector-1",
        EntityKind::Backups,
        &RawPayload::lines([[
            "node_backup_statuses",
            "n1",
            "1700000000000",
            "1700000100000",
            "False",
        ]]),
    );
    let params = CheckParams {
        backup_age: ThresholdSpec::Absent,
        ..CheckParams::default()
    };
    let reports = evaluator(at(1_700_003_600), params).evaluate(&input, None);

    let nodes = reports.iter().find(|r| r.item == "Nodes").unwrap();
    assert_eq!(nodes.service, "NSX Backups Nodes");
    assert_eq!(nodes.state, Severity::Crit);
    assert_eq!(
        nodes.findings.summaries(),
        [
            "Last Backup failed!",
            "Time: 2023-11-14 22:13:20",
            "Age: 1 hour 0 minutes",
        ]
    );
    let age = &nodes.findings.findings()[2];
    assert_eq!(age.severity, Severity::Ok);
    let metric = age.metric.as_ref().unwrap();
    assert_eq!(metric.name, "age");
    assert_eq!(metric.value, 3600.0);
    assert_eq!(metric.levels, None);

    // The placeholders report "no data" without alarming.
    let cluster = reports.iter().find(|r| r.item == "Cluster").unwrap();
    assert_eq!(cluster.findings.summaries(), ["No data found and none needed"]);
    assert_eq!(cluster.state, Severity::Ok);
}

#[test]
fn missing_backup_is_critical_with_levels() {
    let mut input = CycleInput::new();
    input.add_payload(
        "collector-1",
        EntityKind::Backups,
        &RawPayload::lines([[
            "cluster_backup_statuses",
            "c1",
            "1700000000000",
            "1700000100000",
            "True",
        ]]),
    );
    let reports = evaluator(at(1_700_000_000 + 200_000), CheckParams::default())
        .evaluate(&input, None);
    let items: Vec<_> = reports.iter().map(|r| (r.item.as_str(), r.state)).collect();
    assert_eq!(
        items,
        [
            ("Cluster", Severity::Crit),
            ("Inventory", Severity::Crit),
            ("Nodes", Severity::Crit),
        ]
    );
    assert_eq!(
        reports[0].findings.summaries().last().copied(),
        Some("Age: 2 days 7 hours (warn/crit at 1 day 2 hours/2 days 2 hours)")
    );
}

#[test]
fn certificate_five_days_out() {
    let now = at(1_700_000_000);
    let expiry = now + Duration::days(5) + Duration::hours(3);
    let blob = format!(
        r#"[{{"id": "c-1", "display_name": "api", "details": {{"not_after": {}, "subject_cn": "api.example"}}}}]"#,
        expiry.timestamp_millis()
    );
    let mut input = CycleInput::new();
    input.add_payload("collector-1", EntityKind::Certificates, &RawPayload::blob(blob));

    let params = CheckParams {
        certificate_validity: ThresholdSpec::Lower(Levels::new(25.0, 10.0)),
        ..CheckParams::default()
    };
    let reports = evaluator(now, params).evaluate(&input, None);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].service, "NSX Certificate api");
    assert_eq!(reports[0].state, Severity::Crit);
    assert_eq!(
        reports[0].findings.summaries(),
        ["Certificate valid for (days): 5 (warn/crit below 25/10)"]
    );
}

#[test]
fn load_balancer_cluster_lists_all_nodes() {
    let mut input = CycleInput::new();
    input.add_output(
        "A",
        &AgentOutput::parse("<<<nsx_loadbalancer>>>\nlb1 id-1 UP True\n"),
    );
    input.add_output("B", &AgentOutput::parse("<<<nsx_loadbalancer>>>\n"));

    let reports = evaluator(at(1_700_000_000), CheckParams::default()).evaluate(&input, None);
    assert_eq!(reports.len(), 1);
    assert_eq!(
        reports[0].findings.summaries(),
        ["Nodes: A, B", "is enabled", "State: UP", "ID: id-1"]
    );
    assert_eq!(reports[0].state, Severity::Ok);
}

#[test]
fn virtual_server_divergence_flagged_once() {
    let base = "<<<nsx_vservers>>>\nvs-1 UP True web\n";
    let mut input = CycleInput::new();
    input.add_output("A", &AgentOutput::parse(base));
    input.add_output("B", &AgentOutput::parse(base));
    input.add_output(
        "C",
        &AgentOutput::parse("<<<nsx_vservers>>>\nvs-1 UP True web l4_current_sessions=3\n"),
    );

    let reports = evaluator(at(1_700_000_000), CheckParams::default()).evaluate(&input, None);
    let web = &reports[0];
    assert_eq!(web.service, "NSX Virtual Server web");
    assert_eq!(web.state, Severity::Unknown);
    let flagged = web
        .findings
        .summaries()
        .into_iter()
        .filter(|s| *s == DIVERGENCE_SUMMARY)
        .count();
    assert_eq!(flagged, 1);
}

#[test]
fn pools_from_separated_blob_sections() {
    let text = concat!(
        "<<<nsx_pools:sep(0)>>>\n",
        r#"[{"display_name": "pool-a", "pool_id": "p-1", "status": "PARTIALLY_UP", "member_count": 4}, "#,
        r#"{"display_name": "pool-b", "pool_id": "p-2", "status": "RECOVERING"}]"#,
        "\n",
    );
    let mut input = CycleInput::new();
    input.add_output("A", &AgentOutput::parse(text));

    let reports = evaluator(at(1_700_000_000), CheckParams::default()).evaluate(&input, None);
    let states: Vec<_> = reports
        .iter()
        .map(|r| (r.service.as_str(), r.state))
        .collect();
    assert_eq!(
        states,
        [
            ("NSX Pool pool-a", Severity::Warn),
            ("NSX Pool pool-b", Severity::Unknown),
        ]
    );
    assert_eq!(
        reports[1].findings.summaries(),
        ["State: unknown[RECOVERING]", "ID: p-2"]
    );
}

#[test]
fn config_drives_node_order_and_levels() {
    let cfg = load_from_str(
        "node_order: insertion\nmemory:\n  levels: [50, 60]\n",
    )
    .unwrap();
    let mem = "<<<nsx_mem>>>\nMemTotal 1000\nMemAvailable 450\n";
    let mut input = CycleInput::new();
    input.add_output("z-node", &AgentOutput::parse(mem));
    input.add_output("a-node", &AgentOutput::parse(mem));

    let eval = Evaluator::from_config(&cfg, at(1_700_000_000));
    let reports = eval.evaluate(&input, Some(&[EntityKind::Memory]));
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].service, "NSX Memory");
    assert_eq!(reports[0].state, Severity::Warn);
    assert_eq!(reports[0].findings.summaries()[0], "Nodes: z-node, a-node");
}

#[test]
fn reports_serialize_for_the_pipeline() {
    let mut input = CycleInput::new();
    input.add_output("A", &AgentOutput::parse("<<<nsx_cpu>>>\n4\n1.0 2.0 24.0\n"));
    let reports = evaluator(at(1_700_000_000), CheckParams::default()).evaluate(&input, None);

    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(json[0]["service"], "NSX CPU load");
    assert_eq!(json[0]["state"], "WARN");
    assert_eq!(json[0]["kind"], "cpu");
    assert_eq!(json[0]["findings"][0]["metric"]["name"], "load15");
}

#[test]
fn extreme_memory_values_still_yield_a_verdict() {
    let mut input = CycleInput::new();
    input.add_output(
        "A",
        &AgentOutput::parse("<<<nsx_mem>>>\nMemTotal 9223372036854775807\nMemFree -1\n"),
    );
    let reports = evaluator(at(1_700_000_000), CheckParams::default()).evaluate(&input, None);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].state, Severity::Crit);
}

#[test]
fn cluster_lists_collector_that_sent_other_sections_only() {
    let mut input = CycleInput::new();
    input.add_output(
        "A",
        &AgentOutput::parse("<<<nsx_loadbalancer>>>\nlb1 id-1 UP True\n"),
    );
    input.add_output("B", &AgentOutput::parse("<<<nsx_edges>>>\n[]\n"));

    let reports = evaluator(at(1_700_000_000), CheckParams::default())
        .evaluate(&input, Some(&[EntityKind::LoadBalancers]));
    assert_eq!(reports.len(), 1);
    assert_eq!(
        reports[0].findings.summaries(),
        ["Nodes: A, B", "is enabled", "State: UP", "ID: id-1"]
    );
}
