//! Raw collector payloads to per-node [`Catalog`]s.
//!
//! Line payloads map columns positionally per entity kind, blob payloads map
//! JSON keys through a fixed rename table. A malformed required value skips
//! only the offending record; the error is kept on the catalog.

use serde_json::{Map, Value};

use crate::catalog::{Catalog, CatalogBuilder};
use crate::entity::{from_epoch_millis, Entity, EntityKind, PayloadShape};
use crate::error::ParseError;
use crate::payload::RawPayload;

/// Backup type column values and the display names they are catalogued under.
pub const BACKUP_TYPES: [(&str, &str); 3] = [
    ("cluster_backup_statuses", "Cluster"),
    ("inventory_backup_statuses", "Inventory"),
    ("node_backup_statuses", "Nodes"),
];

pub const UNKNOWN_BACKUP_TYPE: &str = "UNKNOWN";
pub const CPU_ITEM: &str = "CPU load";
pub const MEMORY_ITEM: &str = "Memory";

const LOAD_GAUGES: [&str; 3] = ["load1", "load5", "load15"];

pub fn canonicalize(collector_id: &str, payload: &RawPayload, kind: EntityKind) -> Catalog {
    let mut builder = CatalogBuilder::new(collector_id, kind);

    match (kind.payload_shape(), payload) {
        (PayloadShape::Lines, RawPayload::Lines(rows)) => canonicalize_rows(&mut builder, kind, rows),
        (PayloadShape::Lines, RawPayload::Blob(text)) => {
            let rows: Vec<Vec<String>> = text
                .lines()
                .map(|l| l.split_whitespace().map(str::to_string).collect())
                .collect();
            canonicalize_rows(&mut builder, kind, &rows)
        }
        (PayloadShape::Blob, RawPayload::Blob(text)) => canonicalize_blob(&mut builder, kind, text),
        (PayloadShape::Blob, RawPayload::Lines(rows)) => {
            let text = rows.first().map(|r| r.join(" ")).unwrap_or_default();
            canonicalize_blob(&mut builder, kind, &text)
        }
    }

    let catalog = builder.build();
    tracing::debug!(
        collector = collector_id,
        %kind,
        entities = catalog.len(),
        rejected = catalog.errors().len(),
        "canonicalized payload"
    );
    catalog
}

fn canonicalize_rows(b: &mut CatalogBuilder, kind: EntityKind, rows: &[Vec<String>]) {
    match kind {
        EntityKind::Backups => {
            for (_, name) in BACKUP_TYPES {
                b.placeholder(name);
            }
            each_row(b, rows, backup_row);
        }
        EntityKind::LoadBalancers => each_row(b, rows, loadbalancer_row),
        EntityKind::VirtualServers => each_row(b, rows, vserver_row),
        EntityKind::Cpu => cpu_rows(b, rows),
        EntityKind::Memory => memory_rows(b, rows),
        EntityKind::Certificates | EntityKind::Pools | EntityKind::Edges => {
            tracing::debug!(%kind, "no line schema for blob kind");
        }
    }
}

type RowParser = fn(usize, &[String]) -> Result<Option<(String, Entity)>, ParseError>;

fn each_row(b: &mut CatalogBuilder, rows: &[Vec<String>], parse: RowParser) {
    for (idx, row) in rows.iter().enumerate() {
        match parse(idx, row) {
            Ok(Some((name, entity))) => {
                if !b.insert(name.clone(), entity) {
                    tracing::debug!(row = idx, item = %name, "duplicate display name dropped");
                }
            }
            Ok(None) => tracing::debug!(row = idx, "row has no display name, skipped"),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed row");
                b.reject(e);
            }
        }
    }
}

fn backup_row(idx: usize, row: &[String]) -> Result<Option<(String, Entity)>, ParseError> {
    let Some(raw_type) = row.first() else {
        return Ok(None);
    };
    let name = BACKUP_TYPES
        .iter()
        .find(|(t, _)| t == raw_type)
        .map(|(_, n)| *n)
        .unwrap_or(UNKNOWN_BACKUP_TYPE);

    let entity = Entity {
        id: row.get(1).cloned(),
        start_time: row
            .get(2)
            .map(|v| parse_timestamp(idx, "startTime", v))
            .transpose()?,
        end_time: row
            .get(3)
            .map(|v| parse_timestamp(idx, "endTime", v))
            .transpose()?,
        success: row.get(4).cloned(),
        ..Default::default()
    };
    Ok(Some((name.to_string(), entity)))
}

fn loadbalancer_row(_idx: usize, row: &[String]) -> Result<Option<(String, Entity)>, ParseError> {
    let Some(name) = row.first() else {
        return Ok(None);
    };
    let entity = Entity {
        id: row.get(1).cloned(),
        status: row.get(2).cloned(),
        enabled: row.get(3).cloned(),
        ..Default::default()
    };
    Ok(Some((name.clone(), entity)))
}

fn vserver_row(idx: usize, row: &[String]) -> Result<Option<(String, Entity)>, ParseError> {
    let Some(name) = row.get(3) else {
        return Ok(None);
    };
    let mut entity = Entity {
        id: row.first().cloned(),
        status: row.get(1).cloned(),
        enabled: row.get(2).cloned(),
        ..Default::default()
    };
    for column in row.iter().skip(4) {
        let (counter, value) = column
            .split_once('=')
            .filter(|(k, _)| !k.is_empty())
            .ok_or_else(|| ParseError::InvalidCounter {
                row: idx,
                value: column.clone(),
            })?;
        let value = parse_int(idx, counter, value)?;
        entity.counters.entry(counter.to_string()).or_insert(value);
    }
    Ok(Some((name.clone(), entity)))
}

fn cpu_rows(b: &mut CatalogBuilder, rows: &[Vec<String>]) {
    let mut entity = Entity::default();
    let mut contributed = false;

    if let Some(cell) = rows.first().and_then(|r| r.first()) {
        match parse_int(0, "num_cpus", cell) {
            Ok(n) => {
                entity.counters.insert("num_cpus".into(), n);
                contributed = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping cpu count row");
                b.reject(e);
            }
        }
    }

    if let Some(loads) = rows.get(1) {
        let parsed: Result<Vec<f64>, ParseError> = loads
            .iter()
            .zip(LOAD_GAUGES)
            .map(|(v, name)| parse_float(1, name, v))
            .collect();
        match parsed {
            Ok(values) => {
                for (name, value) in LOAD_GAUGES.iter().zip(values) {
                    entity.gauges.insert(name.to_string(), value);
                }
                contributed = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping cpu load row");
                b.reject(e);
            }
        }
    }

    if contributed {
        b.insert(CPU_ITEM.to_string(), entity);
    }
}

fn memory_rows(b: &mut CatalogBuilder, rows: &[Vec<String>]) {
    let mut entity = Entity::default();
    let mut contributed = false;

    for (idx, row) in rows.iter().enumerate() {
        let (Some(name), Some(value)) = (row.first(), row.get(1)) else {
            tracing::debug!(row = idx, "memory row without value, skipped");
            continue;
        };
        match parse_int(idx, name, value) {
            Ok(kib) => {
                entity
                    .counters
                    .entry(name.clone())
                    .or_insert(kib.saturating_mul(1024));
                contributed = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping memory row");
                b.reject(e);
            }
        }
    }

    if contributed {
        b.insert(MEMORY_ITEM.to_string(), entity);
    }
}

fn canonicalize_blob(b: &mut CatalogBuilder, kind: EntityKind, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    let items = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items,
        Ok(Value::Null) => return,
        Ok(other) => {
            b.reject(ParseError::MalformedBlob {
                reason: format!("expected a list, found {}", json_type(&other)),
            });
            return;
        }
        Err(e) => {
            tracing::warn!(error = %e, %kind, "blob payload is not valid JSON");
            b.reject(ParseError::MalformedBlob {
                reason: e.to_string(),
            });
            return;
        }
    };

    let parse: fn(usize, &Map<String, Value>) -> Result<Option<(String, Entity)>, ParseError> =
        match kind {
            EntityKind::Certificates => certificate_object,
            EntityKind::Pools => pool_object,
            EntityKind::Edges => edge_object,
            _ => {
                tracing::debug!(%kind, "no blob schema for line kind");
                return;
            }
        };

    for (idx, item) in items.iter().enumerate() {
        let Some(object) = item.as_object() else {
            tracing::debug!(row = idx, "blob entry is not an object, skipped");
            continue;
        };
        match parse(idx, object) {
            Ok(Some((name, entity))) => {
                if !b.insert(name.clone(), entity) {
                    tracing::debug!(row = idx, item = %name, "duplicate display name dropped");
                }
            }
            Ok(None) => tracing::debug!(row = idx, "object has no display name, skipped"),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed object");
                b.reject(e);
            }
        }
    }
}

fn certificate_object(
    idx: usize,
    cert: &Map<String, Value>,
) -> Result<Option<(String, Entity)>, ParseError> {
    let Some(name) = cert.get("display_name").and_then(scalar_string) else {
        return Ok(None);
    };
    let details = cert.get("details").and_then(Value::as_object);
    let not_after = details
        .and_then(|d| d.get("not_after"))
        .filter(|v| !v.is_null())
        .map(|v| json_timestamp(idx, "notAfter", v))
        .transpose()?;

    let entity = Entity {
        id: cert.get("id").and_then(scalar_string),
        not_after,
        common_name: details
            .and_then(|d| d.get("subject_cn"))
            .and_then(scalar_string),
        ..Default::default()
    };
    Ok(Some((name, entity)))
}

fn pool_object(_idx: usize, pool: &Map<String, Value>) -> Result<Option<(String, Entity)>, ParseError> {
    let Some(name) = pool.get("display_name").and_then(scalar_string) else {
        return Ok(None);
    };
    let mut entity = Entity {
        id: pool.get("pool_id").and_then(scalar_string),
        status: pool.get("status").and_then(scalar_string),
        ..Default::default()
    };
    for (key, value) in pool {
        if matches!(key.as_str(), "display_name" | "pool_id" | "status") {
            continue;
        }
        if let Some(n) = value.as_i64() {
            entity.counters.insert(key.clone(), n);
        }
    }
    Ok(Some((name, entity)))
}

fn edge_object(_idx: usize, edge: &Map<String, Value>) -> Result<Option<(String, Entity)>, ParseError> {
    let Some(name) = edge.get("node_display_name").and_then(scalar_string) else {
        return Ok(None);
    };
    let entity = Entity {
        id: edge.get("node_uuid").and_then(scalar_string),
        status: edge.get("status").and_then(scalar_string),
        ..Default::default()
    };
    Ok(Some((name, entity)))
}

fn parse_int(row: usize, field: &str, value: &str) -> Result<i64, ParseError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidInteger {
            row,
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn parse_float(row: usize, field: &str, value: &str) -> Result<f64, ParseError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            row,
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn parse_timestamp(
    row: usize,
    field: &str,
    value: &str,
) -> Result<chrono::DateTime<chrono::Utc>, ParseError> {
    let ms = parse_int(row, field, value)?;
    from_epoch_millis(ms).ok_or_else(|| ParseError::TimestampOutOfRange {
        row,
        field: field.to_string(),
        value: ms,
    })
}

fn json_timestamp(
    row: usize,
    field: &str,
    value: &Value,
) -> Result<chrono::DateTime<chrono::Utc>, ParseError> {
    match value {
        Value::Number(n) => {
            let ms = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .ok_or_else(|| ParseError::InvalidInteger {
                    row,
                    field: field.to_string(),
                    value: n.to_string(),
                })?;
            from_epoch_millis(ms).ok_or_else(|| ParseError::TimestampOutOfRange {
                row,
                field: field.to_string(),
                value: ms,
            })
        }
        Value::String(s) => parse_timestamp(row, field, s),
        other => Err(ParseError::InvalidInteger {
            row,
            field: field.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Scalar JSON values as the collector's text form; booleans become
/// `True`/`False` to match the line-table vocabulary.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("True".into()),
        Value::Bool(false) => Some("False".into()),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
