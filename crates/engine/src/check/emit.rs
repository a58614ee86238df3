//! Single-node checks: one entity to its ordered findings.
//!
//! Findings always come out as enabled, status, info, threshold.

use nsxcheck_common::render;
use nsxcheck_common::{Catalog, Entity, EntityKind};

use super::classify::{
    classify, CodeTable, EDGE_STATUS, LOADBALANCER_ENABLED, LOADBALANCER_STATUS, MEMBER_STATUS,
    VSERVER_ENABLED,
};
use super::finding::{Finding, MetricBounds, Render, Verdict};
use super::threshold::{age_seconds, check_levels, days_remaining, no_data};
use super::CheckContext;

/// Checks `item` in a single catalog; `None` when the catalog lacks it.
pub fn check(item: &str, catalog: &Catalog, ctx: &CheckContext) -> Option<Verdict> {
    let entity = catalog.get(item)?;
    Some(check_entity(catalog.kind(), entity, ctx))
}

pub fn check_entity(kind: EntityKind, entity: &Entity, ctx: &CheckContext) -> Verdict {
    match kind {
        EntityKind::LoadBalancers => {
            switchable(entity, &LOADBALANCER_ENABLED, &LOADBALANCER_STATUS)
        }
        EntityKind::VirtualServers => switchable(entity, &VSERVER_ENABLED, &MEMBER_STATUS),
        EntityKind::Pools => [state_finding(entity, &MEMBER_STATUS), id_finding(entity)]
            .into_iter()
            .collect(),
        EntityKind::Edges => edge(entity),
        EntityKind::Backups => backup(entity, ctx),
        EntityKind::Certificates => certificate(entity, ctx),
        EntityKind::Memory => memory(entity, ctx),
        EntityKind::Cpu => cpu(entity, ctx),
    }
}

fn raw<'a>(value: &'a Option<String>) -> &'a str {
    value.as_deref().unwrap_or("")
}

fn switchable(entity: &Entity, enabled: &CodeTable, status: &CodeTable) -> Verdict {
    let e = classify(raw(&entity.enabled), enabled);
    [
        Finding::new(e.severity, format!("is {}", e.text)),
        state_finding(entity, status),
        id_finding(entity),
    ]
    .into_iter()
    .collect()
}

fn state_finding(entity: &Entity, table: &CodeTable) -> Finding {
    let s = classify(raw(&entity.status), table);
    Finding::new(s.severity, format!("State: {}", s.text))
}

fn id_finding(entity: &Entity) -> Finding {
    Finding::ok(format!("ID: {}", raw(&entity.id)))
}

fn edge(entity: &Entity) -> Verdict {
    let s = classify(raw(&entity.status), &EDGE_STATUS);
    [Finding::new(s.severity, format!("is {}", s.text)), id_finding(entity)]
        .into_iter()
        .collect()
}

fn backup(entity: &Entity, ctx: &CheckContext) -> Verdict {
    let spec = ctx.params.backup_age;
    if entity.is_empty() {
        return std::iter::once(no_data(&spec)).collect();
    }

    let mut v = Verdict::new();
    if entity.success.as_deref() != Some("True") {
        v.push(Finding::crit("Last Backup failed!"));
    }

    if let Some(start) = entity.start_time {
        v.push(Finding::ok(format!("Time: {}", render::datetime(&start))));
        v.push(check_levels(
            age_seconds(ctx.now, start),
            &spec,
            "Age",
            Render::Timespan,
            Some((
                "age",
                MetricBounds {
                    min: Some(0.0),
                    max: None,
                },
            )),
        ));
    }
    v
}

fn certificate(entity: &Entity, ctx: &CheckContext) -> Verdict {
    let spec = ctx.params.certificate_validity;
    let Some(expiry) = entity.not_after else {
        return std::iter::once(no_data(&spec)).collect();
    };
    std::iter::once(check_levels(
        days_remaining(ctx.now, expiry) as f64,
        &spec,
        "Certificate valid for (days)",
        Render::Days,
        None,
    ))
    .collect()
}

fn memory(entity: &Entity, ctx: &CheckContext) -> Verdict {
    let spec = ctx.params.memory_used;
    let total = entity.counters.get("MemTotal").copied().filter(|t| *t > 0);
    let free = entity
        .counters
        .get("MemAvailable")
        .or_else(|| entity.counters.get("MemFree"))
        .copied();

    let (Some(total), Some(free)) = (total, free) else {
        return std::iter::once(no_data(&spec)).collect();
    };

    let used = total.saturating_sub(free).clamp(0, total) as f64;
    let pct = used / total as f64 * 100.0;
    let mut finding = check_levels(
        pct,
        &spec,
        "RAM used",
        Render::Percent,
        Some((
            "mem_used_percent",
            MetricBounds {
                min: Some(0.0),
                max: Some(100.0),
            },
        )),
    );
    finding.summary = format!(
        "{} - {} of {}",
        finding.summary,
        render::bytes(used),
        render::bytes(total as f64)
    );
    std::iter::once(finding).collect()
}

fn cpu(entity: &Entity, ctx: &CheckContext) -> Verdict {
    let per_core = ctx.params.cpu_load;
    let cores = entity.counters.get("num_cpus").copied().filter(|n| *n > 0);
    let load15 = entity.gauges.get("load15").copied();

    let (Some(cores), Some(load15)) = (cores, load15) else {
        return std::iter::once(no_data(&per_core)).collect();
    };

    let spec = per_core.scaled(cores as f64);
    let mut finding = check_levels(
        load15,
        &spec,
        "15 min load",
        Render::Float,
        Some((
            "load15",
            MetricBounds {
                min: Some(0.0),
                max: None,
            },
        )),
    );
    finding.summary = format!(
        "{} at {cores} cores ({:.2} per core)",
        finding.summary,
        load15 / cores as f64
    );
    std::iter::once(finding).collect()
}
