//! Whole-cycle evaluation: discovery plus one verdict per discovered entity.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::Serialize;

use nsxcheck_common::{
    canonicalize, AgentOutput, Catalog, EntityKind, MultiNodeCatalog, NodeOrder, ParseError,
    RawPayload, Severity,
};

use crate::check::{check, CheckContext, Verdict};
use crate::config::EngineConfig;
use crate::reconcile::Reconciler;

/// Entity display names across all nodes: first-seen order, nodes visited
/// in `order`, duplicates removed.
pub fn discover(multi: &MultiNodeCatalog, order: NodeOrder) -> Vec<String> {
    let mut seen = IndexSet::new();
    for catalog in multi.ordered(order) {
        for name in catalog.names() {
            seen.insert(name.to_string());
        }
    }
    seen.into_iter().collect()
}

/// One evaluated monitoring service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceReport {
    pub kind: EntityKind,
    pub item: String,
    pub service: String,
    pub state: Severity,
    pub findings: Verdict,
}

/// Per-kind multi-node catalogs for one polling cycle.
///
/// Every collector seen in the cycle takes part in every kind: a collector
/// that sent no section for a kind holds an empty catalog there.
#[derive(Debug, Clone, Default)]
pub struct CycleInput {
    collectors: IndexSet<String>,
    kinds: BTreeMap<EntityKind, MultiNodeCatalog>,
}

impl CycleInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalizes every recognised section of one collector's output.
    pub fn add_output(&mut self, collector_id: &str, output: &AgentOutput) {
        self.add_collector(collector_id);
        for kind in output.kinds() {
            if let Some(payload) = output.payload_for(kind) {
                self.add_payload(collector_id, kind, &payload);
            }
        }
    }

    pub fn add_payload(&mut self, collector_id: &str, kind: EntityKind, payload: &RawPayload) {
        self.add_catalog(canonicalize(collector_id, payload, kind));
    }

    /// Registers a collector, giving it an empty catalog for every kind
    /// already present.
    pub fn add_collector(&mut self, collector_id: &str) {
        if !self.collectors.insert(collector_id.to_string()) {
            return;
        }
        for (kind, multi) in self.kinds.iter_mut() {
            multi.insert(Catalog::empty(collector_id, *kind));
        }
    }

    /// Replaces the collector's catalog for its kind, keeping its position.
    pub fn add_catalog(&mut self, catalog: Catalog) {
        self.add_collector(catalog.collector_id());
        let kind = catalog.kind();
        let collectors = &self.collectors;
        let multi = self.kinds.entry(kind).or_insert_with(|| {
            collectors
                .iter()
                .map(|id| Catalog::empty(id, kind))
                .collect()
        });
        multi.insert(catalog);
    }

    /// Collector ids in the order they were first seen.
    pub fn collectors(&self) -> impl Iterator<Item = &str> {
        self.collectors.iter().map(String::as_str)
    }

    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.kinds.keys().copied()
    }

    pub fn get(&self, kind: EntityKind) -> Option<&MultiNodeCatalog> {
        self.kinds.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Rejected records per `(collector, kind)`, in kind then insertion order.
    pub fn parse_errors(&self) -> Vec<(&str, EntityKind, &ParseError)> {
        self.kinds
            .iter()
            .flat_map(|(kind, multi)| {
                multi.ordered(NodeOrder::Insertion).into_iter().flat_map(move |c| {
                    c.errors().iter().map(move |e| (c.collector_id(), *kind, e))
                })
            })
            .collect()
    }
}

pub struct Evaluator {
    ctx: CheckContext,
    order: NodeOrder,
}

impl Evaluator {
    pub fn new(ctx: CheckContext, order: NodeOrder) -> Self {
        Self { ctx, order }
    }

    pub fn from_config(config: &EngineConfig, now: DateTime<Utc>) -> Self {
        Self::new(CheckContext::new(now, config.check_params()), config.node_order)
    }

    pub fn context(&self) -> &CheckContext {
        &self.ctx
    }

    pub fn order(&self) -> NodeOrder {
        self.order
    }

    /// Verdict for one item. A single collector is checked directly; several
    /// are reconciled. Empty when no node reports the item.
    pub fn evaluate_item(&self, kind: EntityKind, item: &str, multi: &MultiNodeCatalog) -> Verdict {
        match multi.ordered(self.order).as_slice() {
            [] => Verdict::new(),
            [single] => check(item, single, &self.ctx).unwrap_or_default(),
            _ => Reconciler::new(&self.ctx, self.order).reconcile(kind, item, multi),
        }
    }

    /// Every discovered entity of `kind`, sorted by display name, with empty
    /// verdicts omitted.
    pub fn evaluate_kind(&self, kind: EntityKind, multi: &MultiNodeCatalog) -> Vec<ServiceReport> {
        let items: BTreeSet<String> = discover(multi, self.order).into_iter().collect();

        items
            .into_iter()
            .filter_map(|item| {
                let findings = self.evaluate_item(kind, &item, multi);
                let state = findings.state()?;
                Some(ServiceReport {
                    kind,
                    service: kind.service_name(&item),
                    item,
                    state,
                    findings,
                })
            })
            .collect()
    }

    /// All kinds present in `input`, restricted to `only` when given.
    pub fn evaluate(&self, input: &CycleInput, only: Option<&[EntityKind]>) -> Vec<ServiceReport> {
        let mut reports = Vec::new();
        for kind in input.kinds() {
            if only.is_some_and(|k| !k.contains(&kind)) {
                continue;
            }
            if let Some(multi) = input.get(kind) {
                reports.extend(self.evaluate_kind(kind, multi));
            }
        }

        let worst = reports
            .iter()
            .map(|r| r.state)
            .reduce(Severity::worst);
        tracing::info!(
            services = reports.len(),
            crit = count(&reports, Severity::Crit),
            warn = count(&reports, Severity::Warn),
            unknown = count(&reports, Severity::Unknown),
            worst = worst.map(|s| s.as_str()).unwrap_or("-"),
            "cycle evaluated"
        );
        reports
    }
}

fn count(reports: &[ServiceReport], state: Severity) -> usize {
    reports.iter().filter(|r| r.state == state).count()
}
