use std::path::Path;

use thiserror::Error;

use super::schema::EngineConfig;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("validation: {0}")]
    Validation(String),
}

pub fn load_from_file(path: &Path) -> Result<EngineConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "loading engine config");
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<EngineConfig, LoadError> {
    let cfg: EngineConfig = if yaml.trim().is_empty() {
        EngineConfig::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    validate(&cfg)?;
    Ok(cfg)
}

/// Boundaries must be finite and non-negative. Inverted levels only log a
/// warning.
pub fn validate(cfg: &EngineConfig) -> Result<(), LoadError> {
    for (name, levels) in cfg.levels() {
        let Some(l) = levels else {
            continue;
        };
        for (which, value) in [("warn", l.warn), ("crit", l.crit)] {
            if !value.is_finite() {
                return Err(LoadError::Validation(format!(
                    "{name}: {which} level must be finite"
                )));
            }
            if value < 0.0 {
                return Err(LoadError::Validation(format!(
                    "{name}: {which} level must be >= 0, got {value}"
                )));
            }
        }
    }

    let lower = cfg.certificates.age_levels.filter(|l| l.warn < l.crit);
    if let Some(l) = lower {
        tracing::warn!(warn = l.warn, crit = l.crit, "certificates.age_levels: warn below crit");
    }
    for (name, levels) in [
        ("backups.age_levels_upper", cfg.backups.age_levels_upper),
        ("memory.levels", cfg.memory.levels),
        ("cpu.load_levels", cfg.cpu.load_levels),
    ] {
        if let Some(l) = levels.filter(|l| l.warn > l.crit) {
            tracing::warn!(warn = l.warn, crit = l.crit, "{name}: warn above crit");
        }
    }
    Ok(())
}
