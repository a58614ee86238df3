use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::error::ParseError;

/// One collector node's canonical snapshot of one entity kind.
///
/// Built once by the canonicalizer and read-only afterwards. Display names
/// are unique and kept in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    collector_id: String,
    kind: EntityKind,
    entities: IndexMap<String, Entity>,
    errors: Vec<ParseError>,
}

impl Catalog {
    /// Catalog of a collector that sent no payload for `kind`.
    pub fn empty(collector_id: &str, kind: EntityKind) -> Self {
        CatalogBuilder::new(collector_id, kind).build()
    }

    pub fn collector_id(&self) -> &str {
        &self.collector_id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.entities.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Records that were skipped while building this catalog.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }
}

/// First-write-wins accumulator behind [`Catalog`].
pub(crate) struct CatalogBuilder {
    collector_id: String,
    kind: EntityKind,
    entities: IndexMap<String, Entity>,
    placeholders: IndexSet<String>,
    errors: Vec<ParseError>,
}

impl CatalogBuilder {
    pub(crate) fn new(collector_id: &str, kind: EntityKind) -> Self {
        Self {
            collector_id: collector_id.to_string(),
            kind,
            entities: IndexMap::new(),
            placeholders: IndexSet::new(),
            errors: Vec::new(),
        }
    }

    /// Reserves `name` with an empty entity that the first real record replaces.
    pub(crate) fn placeholder(&mut self, name: &str) {
        if !self.entities.contains_key(name) {
            self.entities.insert(name.to_string(), Entity::default());
            self.placeholders.insert(name.to_string());
        }
    }

    /// Returns false when `name` was already taken by an earlier record.
    pub(crate) fn insert(&mut self, name: String, entity: Entity) -> bool {
        if self.placeholders.shift_remove(&name) {
            self.entities.insert(name, entity);
            return true;
        }
        if self.entities.contains_key(&name) {
            return false;
        }
        self.entities.insert(name, entity);
        true
    }

    pub(crate) fn reject(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub(crate) fn build(self) -> Catalog {
        Catalog {
            collector_id: self.collector_id,
            kind: self.kind,
            entities: self.entities,
            errors: self.errors,
        }
    }
}

/// Order in which collector nodes are visited during reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeOrder {
    /// Lexicographic by collector identifier.
    #[default]
    ByCollectorId,
    /// The order catalogs were added in.
    Insertion,
}

/// Independent per-node catalogs of the same entity kind.
#[derive(Debug, Clone, Default)]
pub struct MultiNodeCatalog {
    nodes: IndexMap<String, Catalog>,
}

impl MultiNodeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node's catalog. A second catalog for the same collector replaces
    /// the first but keeps its insertion position.
    pub fn insert(&mut self, catalog: Catalog) {
        self.nodes.insert(catalog.collector_id.clone(), catalog);
    }

    pub fn get(&self, collector_id: &str) -> Option<&Catalog> {
        self.nodes.get(collector_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Catalogs in the requested visiting order.
    pub fn ordered(&self, order: NodeOrder) -> Vec<&Catalog> {
        let mut nodes: Vec<&Catalog> = self.nodes.values().collect();
        if order == NodeOrder::ByCollectorId {
            nodes.sort_by(|a, b| a.collector_id.cmp(&b.collector_id));
        }
        nodes
    }

    pub fn collector_ids(&self, order: NodeOrder) -> Vec<&str> {
        self.ordered(order)
            .into_iter()
            .map(Catalog::collector_id)
            .collect()
    }
}

impl FromIterator<Catalog> for MultiNodeCatalog {
    fn from_iter<I: IntoIterator<Item = Catalog>>(iter: I) -> Self {
        let mut multi = Self::new();
        for catalog in iter {
            multi.insert(catalog);
        }
        multi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(status: &str) -> Entity {
        Entity {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    fn catalog(node: &str) -> Catalog {
        let mut b = CatalogBuilder::new(node, EntityKind::Edges);
        b.insert("e1".into(), entity("UP"));
        b.build()
    }

    #[test]
    fn first_write_wins() {
        let mut b = CatalogBuilder::new("n1", EntityKind::Edges);
        assert!(b.insert("e1".into(), entity("UP")));
        assert!(!b.insert("e1".into(), entity("DOWN")));
        let c = b.build();
        assert_eq!(c.get("e1").unwrap().status.as_deref(), Some("UP"));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn placeholder_replaced_once() {
        let mut b = CatalogBuilder::new("n1", EntityKind::Backups);
        b.placeholder("Cluster");
        b.placeholder("Nodes");
        assert!(b.insert("Nodes".into(), entity("a")));
        assert!(!b.insert("Nodes".into(), entity("b")));
        let c = b.build();
        assert!(c.get("Cluster").unwrap().is_empty());
        assert_eq!(c.get("Nodes").unwrap().status.as_deref(), Some("a"));
        let names: Vec<&str> = c.names().collect();
        assert_eq!(names, vec!["Cluster", "Nodes"]);
    }

    #[test]
    fn insertion_order_preserved() {
        let mut b = CatalogBuilder::new("n1", EntityKind::Edges);
        for name in ["zeta", "alpha", "mid"] {
            b.insert(name.into(), entity("UP"));
        }
        let c = b.build();
        let names: Vec<&str> = c.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn empty_catalog_has_no_entities() {
        let c = Catalog::empty("n1", EntityKind::Backups);
        assert_eq!(c.collector_id(), "n1");
        assert_eq!(c.kind(), EntityKind::Backups);
        assert!(c.is_empty());
        assert!(c.errors().is_empty());
    }

    #[test]
    fn node_order_explicit() {
        let multi: MultiNodeCatalog = [catalog("node-b"), catalog("node-a")].into_iter().collect();
        assert_eq!(multi.collector_ids(NodeOrder::ByCollectorId), vec!["node-a", "node-b"]);
        assert_eq!(multi.collector_ids(NodeOrder::Insertion), vec!["node-b", "node-a"]);
    }
}
