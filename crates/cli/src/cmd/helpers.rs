use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use nsxcheck_common::{AgentOutput, EntityKind};
use nsxcheck_engine::config::{load_from_file, EngineConfig};
use nsxcheck_engine::CycleInput;
use std::path::{Path, PathBuf};

pub fn default_config_path() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        return dir.join("nsxcheck").join("config.yml");
    }
    PathBuf::from("/etc/nsxcheck/config.yml")
}

/// An explicit path must exist; a missing default file means built-in
/// thresholds.
pub fn load_config(config_path: Option<&str>) -> Result<EngineConfig> {
    let path = match config_path {
        Some(p) => PathBuf::from(p),
        None => {
            let p = default_config_path();
            if !p.exists() {
                tracing::debug!(path = %p.display(), "no config file, using defaults");
                return Ok(EngineConfig::default());
            }
            p
        }
    };

    load_from_file(&path).with_context(|| format!("loading config from {}", path.display()))
}

/// One collector node's agent output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSource {
    pub collector_id: String,
    pub path: PathBuf,
}

/// Parses `name=path`, or a bare path whose file stem names the collector.
pub fn parse_node_arg(arg: &str) -> Result<NodeSource, String> {
    let (id, path) = match arg.split_once('=') {
        Some((id, path)) => (id.trim().to_string(), PathBuf::from(path)),
        None => {
            let path = PathBuf::from(arg);
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            (stem, path)
        }
    };
    if id.is_empty() {
        return Err(format!("no collector id in '{arg}'"));
    }
    if path.as_os_str().is_empty() {
        return Err(format!("no file path in '{arg}'"));
    }
    Ok(NodeSource {
        collector_id: id,
        path,
    })
}

pub fn read_output(path: &Path) -> Result<AgentOutput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading agent output {}", path.display()))?;
    Ok(AgentOutput::parse(&text))
}

pub fn load_input(nodes: &[NodeSource]) -> Result<CycleInput> {
    let mut input = CycleInput::new();
    for (idx, node) in nodes.iter().enumerate() {
        if nodes[..idx].iter().any(|n| n.collector_id == node.collector_id) {
            bail!("collector '{}' given more than once", node.collector_id);
        }
        let output = read_output(&node.path)?;
        input.add_output(&node.collector_id, &output);
    }
    Ok(input)
}

pub fn resolve_now(epoch_secs: Option<i64>) -> Result<DateTime<Utc>> {
    match epoch_secs {
        Some(s) => DateTime::from_timestamp(s, 0)
            .with_context(|| format!("--now {s} is out of range")),
        None => Ok(Utc::now()),
    }
}

pub fn kind_filter(kinds: &[EntityKind]) -> Option<&[EntityKind]> {
    if kinds.is_empty() {
        None
    } else {
        Some(kinds)
    }
}
