use serde::{Deserialize, Serialize};

use nsxcheck_common::NodeOrder;

use crate::check::{CheckParams, Levels, ThresholdSpec};

/// Threshold rulesets and reconciliation settings. Every key is optional;
/// an explicit `null` level switches that check's alarms off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub node_order: NodeOrder,
    #[serde(default)]
    pub backups: BackupConfig,
    #[serde(default)]
    pub certificates: CertificateConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub cpu: CpuConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackupConfig {
    /// Seconds since the last backup started.
    #[serde(default = "default_backup_age")]
    pub age_levels_upper: Option<Levels>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertificateConfig {
    /// Remaining days of validity.
    #[serde(default = "default_certificate_age")]
    pub age_levels: Option<Levels>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Percent of RAM used.
    #[serde(default = "default_memory_levels")]
    pub levels: Option<Levels>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CpuConfig {
    /// 15 minute load per core.
    #[serde(default = "default_cpu_levels")]
    pub load_levels: Option<Levels>,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            age_levels_upper: default_backup_age(),
        }
    }
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            age_levels: default_certificate_age(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            levels: default_memory_levels(),
        }
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            load_levels: default_cpu_levels(),
        }
    }
}

impl EngineConfig {
    pub fn check_params(&self) -> CheckParams {
        CheckParams {
            backup_age: ThresholdSpec::upper(self.backups.age_levels_upper),
            certificate_validity: ThresholdSpec::lower(self.certificates.age_levels),
            memory_used: ThresholdSpec::upper(self.memory.levels),
            cpu_load: ThresholdSpec::upper(self.cpu.load_levels),
        }
    }

    /// `(name, levels)` for every configurable level pair.
    pub fn levels(&self) -> [(&'static str, Option<Levels>); 4] {
        [
            ("backups.age_levels_upper", self.backups.age_levels_upper),
            ("certificates.age_levels", self.certificates.age_levels),
            ("memory.levels", self.memory.levels),
            ("cpu.load_levels", self.cpu.load_levels),
        ]
    }
}

fn default_backup_age() -> Option<Levels> {
    Some(Levels::new(93_600.0, 180_000.0))
}

fn default_certificate_age() -> Option<Levels> {
    Some(Levels::new(25.0, 10.0))
}

fn default_memory_levels() -> Option<Levels> {
    Some(Levels::new(80.0, 90.0))
}

fn default_cpu_levels() -> Option<Levels> {
    Some(Levels::new(5.0, 10.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full() {
        let yaml = r#"
node_order: insertion
backups:
  age_levels_upper: [3600, 7200]
certificates:
  age_levels: [30, 7]
memory:
  levels: [70.0, 95.0]
cpu:
  load_levels: [2.5, 4]
"#;
        let cfg: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.node_order, NodeOrder::Insertion);
        assert_eq!(cfg.backups.age_levels_upper, Some(Levels::new(3600.0, 7200.0)));
        assert_eq!(cfg.cpu.load_levels, Some(Levels::new(2.5, 4.0)));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg: EngineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.check_params(), CheckParams::default());
    }

    #[test]
    fn null_levels_disable_check() {
        let cfg: EngineConfig = serde_yaml::from_str("backups:\n  age_levels_upper: null\n").unwrap();
        let params = cfg.check_params();
        assert_eq!(params.backup_age, ThresholdSpec::Absent);
        assert!(params.certificate_validity.is_configured());
    }

    #[test]
    fn unknown_key_rejected() {
        let err = serde_yaml::from_str::<EngineConfig>("memory:\n  level: [1, 2]\n").unwrap_err();
        assert!(err.to_string().contains("level"));
    }
}
