//! Merging several collector nodes' views of one entity into one verdict.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use nsxcheck_common::{Entity, EntityKind, MultiNodeCatalog, NodeOrder};

use crate::check::{check_entity, CheckContext, Finding, Verdict};

pub const DIVERGENCE_SUMMARY: &str = "Cluster: data from nodes are not equal.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// List the nodes, then evaluate the first node that reports the entity.
    Representative,
    /// As representative, plus a divergence check across every reporting node.
    Consensus,
    /// Evaluate every reporting node, prefixing captions with the node id.
    PerNode,
}

impl ReconcileMode {
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Pools | EntityKind::VirtualServers => Self::Consensus,
            EntityKind::Certificates => Self::PerNode,
            EntityKind::Backups
            | EntityKind::LoadBalancers
            | EntityKind::Edges
            | EntityKind::Cpu
            | EntityKind::Memory => Self::Representative,
        }
    }
}

pub struct Reconciler<'a> {
    ctx: &'a CheckContext,
    order: NodeOrder,
}

impl<'a> Reconciler<'a> {
    pub fn new(ctx: &'a CheckContext, order: NodeOrder) -> Self {
        Self { ctx, order }
    }

    /// Reconciles `item` using the mode its kind calls for.
    pub fn reconcile(&self, kind: EntityKind, item: &str, multi: &MultiNodeCatalog) -> Verdict {
        self.reconcile_with(ReconcileMode::for_kind(kind), kind, item, multi)
    }

    /// Empty when no node reports `item`.
    pub fn reconcile_with(
        &self,
        mode: ReconcileMode,
        kind: EntityKind,
        item: &str,
        multi: &MultiNodeCatalog,
    ) -> Verdict {
        let nodes = multi.ordered(self.order);
        let reporting: Vec<(&str, &Entity)> = nodes
            .iter()
            .filter_map(|c| c.get(item).map(|e| (c.collector_id(), e)))
            .collect();

        let Some(&(_, canonical)) = reporting.first() else {
            return Verdict::new();
        };

        match mode {
            ReconcileMode::PerNode => reporting
                .iter()
                .flat_map(|(node, entity)| {
                    let prefix = format!("[{node}]: ");
                    check_entity(kind, entity, self.ctx)
                        .into_iter()
                        .map(move |f| f.prefixed(&prefix))
                })
                .collect(),
            ReconcileMode::Representative | ReconcileMode::Consensus => {
                let mut v = Verdict::new();
                v.push(nodes_finding(&multi.collector_ids(self.order)));
                v.extend(check_entity(kind, canonical, self.ctx));

                if mode == ReconcileMode::Consensus && diverges(canonical, &reporting) {
                    tracing::warn!(%kind, item, nodes = reporting.len(), "collector nodes disagree");
                    v.push(Finding::unknown(DIVERGENCE_SUMMARY));
                }
                v
            }
        }
    }
}

fn nodes_finding(ids: &[&str]) -> Finding {
    Finding::ok(format!("Nodes: {}", ids.join(", ")))
}

/// True when the union of every reporting node's `(field, value)` pairs is
/// larger than the canonical node's own set. Nodes that differ only in ways
/// that keep the union the same size go unnoticed.
fn diverges(canonical: &Entity, reporting: &[(&str, &Entity)]) -> bool {
    let own = canonical.field_pairs().len();
    let union: BTreeSet<(String, String)> = reporting
        .iter()
        .flat_map(|(_, e)| e.field_pairs())
        .collect();
    union.len() > own
}
