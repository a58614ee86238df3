use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// One monitored object as reported by a single collector node.
///
/// Every attribute is optional; which ones are present depends on the
/// entity kind and on what the collector actually sent. Missing counters are
/// absent from the map, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: Option<String>,
    pub status: Option<String>,
    pub enabled: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub success: Option<String>,
    pub not_after: Option<DateTime<Utc>>,
    pub common_name: Option<String>,
    #[serde(default)]
    pub counters: BTreeMap<String, i64>,
    #[serde(default)]
    pub gauges: BTreeMap<String, f64>,
}

impl Entity {
    /// True when no attribute at all was reported.
    pub fn is_empty(&self) -> bool {
        self.field_pairs().is_empty()
    }

    /// The entity flattened to distinct `(field, value)` pairs.
    pub fn field_pairs(&self) -> BTreeSet<(String, String)> {
        let mut pairs = BTreeSet::new();
        let mut put = |name: &str, value: Option<String>| {
            if let Some(v) = value {
                pairs.insert((name.to_string(), v));
            }
        };

        put("id", self.id.clone());
        put("status", self.status.clone());
        put("enabled", self.enabled.clone());
        put("startTime", self.start_time.map(|t| t.timestamp_millis().to_string()));
        put("endTime", self.end_time.map(|t| t.timestamp_millis().to_string()));
        put("success", self.success.clone());
        put("notAfter", self.not_after.map(|t| t.timestamp_millis().to_string()));
        put("cn", self.common_name.clone());

        for (name, value) in &self.counters {
            pairs.insert((name.clone(), value.to_string()));
        }
        for (name, value) in &self.gauges {
            pairs.insert((name.clone(), value.to_string()));
        }
        pairs
    }
}

/// Epoch milliseconds to an absolute point in time (`ms / 1000` seconds).
pub fn from_epoch_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// Shape of the raw payload a collector delivers for one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Lines,
    Blob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Backups,
    Certificates,
    LoadBalancers,
    Pools,
    VirtualServers,
    Edges,
    Cpu,
    Memory,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        Self::Backups,
        Self::Certificates,
        Self::LoadBalancers,
        Self::Pools,
        Self::VirtualServers,
        Self::Edges,
        Self::Cpu,
        Self::Memory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backups => "backups",
            Self::Certificates => "certificates",
            Self::LoadBalancers => "load_balancers",
            Self::Pools => "pools",
            Self::VirtualServers => "virtual_servers",
            Self::Edges => "edges",
            Self::Cpu => "cpu",
            Self::Memory => "memory",
        }
    }

    /// Agent output section carrying this kind.
    pub fn section_name(&self) -> &'static str {
        match self {
            Self::Backups => "nsx_backups",
            Self::Certificates => "nsx_certificates",
            Self::LoadBalancers => "nsx_loadbalancer",
            Self::Pools => "nsx_pools",
            Self::VirtualServers => "nsx_vservers",
            Self::Edges => "nsx_edges",
            Self::Cpu => "nsx_cpu",
            Self::Memory => "nsx_mem",
        }
    }

    pub fn from_section_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.section_name() == name)
    }

    pub fn payload_shape(&self) -> PayloadShape {
        match self {
            Self::Certificates | Self::Pools | Self::Edges => PayloadShape::Blob,
            _ => PayloadShape::Lines,
        }
    }

    pub fn service_name(&self, item: &str) -> String {
        match self {
            Self::Backups => format!("NSX Backups {item}"),
            Self::Certificates => format!("NSX Certificate {item}"),
            Self::LoadBalancers => format!("NSX LoadBalancer {item}"),
            Self::Pools => format!("NSX Pool {item}"),
            Self::VirtualServers => format!("NSX Virtual Server {item}"),
            Self::Edges => format!("NSX Edge {item}"),
            Self::Cpu | Self::Memory => format!("NSX {item}"),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == raw || k.section_name() == raw)
            .ok_or_else(|| format!("unknown entity kind: {raw}"))
    }
}
