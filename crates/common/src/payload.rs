use indexmap::IndexMap;

use crate::entity::{EntityKind, PayloadShape};

/// Raw data one collector delivered for one entity kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// Ordered rows of string columns.
    Lines(Vec<Vec<String>>),
    /// A single serialized JSON list of objects.
    Blob(String),
}

impl RawPayload {
    pub fn lines<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::Lines(
            rows.into_iter()
                .map(|r| r.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    pub fn blob(json: impl Into<String>) -> Self {
        Self::Blob(json.into())
    }
}

/// One `<<<name>>>` block of collector output.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub separator: Option<char>,
    pub lines: Vec<String>,
}

impl Section {
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.lines
            .iter()
            .map(|line| match self.separator {
                Some(sep) => line.split(sep).map(str::to_string).collect(),
                None => line.split_whitespace().map(str::to_string).collect(),
            })
            .collect()
    }

    pub fn payload(&self, shape: PayloadShape) -> RawPayload {
        match shape {
            PayloadShape::Lines => RawPayload::Lines(self.rows()),
            PayloadShape::Blob => {
                RawPayload::Blob(self.lines.first().cloned().unwrap_or_default())
            }
        }
    }
}

/// Collector output split into named sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentOutput {
    sections: IndexMap<String, Section>,
}

impl AgentOutput {
    /// Splits raw collector output. Repeated sections are concatenated;
    /// text before the first header is ignored.
    pub fn parse(text: &str) -> Self {
        let mut sections: IndexMap<String, Section> = IndexMap::new();
        let mut current: Option<String> = None;

        for line in text.lines() {
            if let Some((name, separator)) = parse_header(line) {
                let entry = sections.entry(name.clone()).or_insert_with(|| Section {
                    name: name.clone(),
                    separator,
                    lines: Vec::new(),
                });
                if separator.is_some() {
                    entry.separator = separator;
                }
                current = Some(name);
                continue;
            }

            let Some(name) = &current else {
                continue;
            };
            if line.trim().is_empty() {
                continue;
            }
            if let Some(section) = sections.get_mut(name) {
                section.lines.push(line.to_string());
            }
        }

        Self { sections }
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Payload for `kind`, if the collector sent its section at all.
    pub fn payload_for(&self, kind: EntityKind) -> Option<RawPayload> {
        self.section(kind.section_name())
            .map(|s| s.payload(kind.payload_shape()))
    }

    /// Kinds present in this output, in section order.
    pub fn kinds(&self) -> Vec<EntityKind> {
        self.section_names()
            .filter_map(|name| {
                let kind = EntityKind::from_section_name(name);
                if kind.is_none() {
                    tracing::debug!(section = name, "ignoring unrecognized section");
                }
                kind
            })
            .collect()
    }
}

fn parse_header(line: &str) -> Option<(String, Option<char>)> {
    let inner = line.trim().strip_prefix("<<<")?.strip_suffix(">>>")?;
    let mut parts = inner.split(':');
    let name = parts.next()?.trim();
    if name.is_empty() {
        return None;
    }

    let separator = parts.find_map(|opt| {
        let code = opt.strip_prefix("sep(")?.strip_suffix(')')?;
        code.parse::<u8>().ok().map(char::from)
    });

    Some((name.to_string(), separator))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\
preamble ignored
<<<nsx_loadbalancer>>>
lb1 id-1 UP True
lb2 id-2 DISABLED False
<<<nsx_pools:sep(0)>>>
[{\"display_name\": \"p1\", \"pool_id\": \"x\", \"status\": \"UP\"}]
<<<nsx_vservers:sep(59)>>>
vs-1;UP;True;web
<<<local>>>
0 foo - bar
";

    #[test]
    fn splits_sections() {
        let out = AgentOutput::parse(OUTPUT);
        let names: Vec<&str> = out.section_names().collect();
        assert_eq!(names, vec!["nsx_loadbalancer", "nsx_pools", "nsx_vservers", "local"]);
        assert_eq!(out.section("nsx_loadbalancer").unwrap().lines.len(), 2);
    }

    #[test]
    fn whitespace_and_custom_separators() {
        let out = AgentOutput::parse(OUTPUT);
        let lb = out.payload_for(EntityKind::LoadBalancers).unwrap();
        assert_eq!(
            lb,
            RawPayload::lines(vec![
                vec!["lb1", "id-1", "UP", "True"],
                vec!["lb2", "id-2", "DISABLED", "False"],
            ])
        );
        let vs = out.payload_for(EntityKind::VirtualServers).unwrap();
        assert_eq!(vs, RawPayload::lines(vec![vec!["vs-1", "UP", "True", "web"]]));
    }

    #[test]
    fn blob_takes_first_line_verbatim() {
        let out = AgentOutput::parse(OUTPUT);
        match out.payload_for(EntityKind::Pools).unwrap() {
            RawPayload::Blob(json) => assert!(json.starts_with("[{\"display_name\"")),
            other => panic!("expected blob, got {other:?}"),
        }
    }

    #[test]
    fn unknown_sections_are_not_kinds() {
        let out = AgentOutput::parse(OUTPUT);
        assert_eq!(
            out.kinds(),
            vec![EntityKind::LoadBalancers, EntityKind::Pools, EntityKind::VirtualServers]
        );
        assert!(out.payload_for(EntityKind::Edges).is_none());
    }

    #[test]
    fn repeated_sections_concatenate() {
        let out = AgentOutput::parse("<<<nsx_mem>>>\nMemTotal 10\n<<<nsx_cpu>>>\n4\n<<<nsx_mem>>>\nMemFree 5\n");
        assert_eq!(out.section("nsx_mem").unwrap().lines, vec!["MemTotal 10", "MemFree 5"]);
    }
}
