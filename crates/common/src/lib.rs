pub mod canonicalize;
pub mod catalog;
pub mod entity;
pub mod error;
pub mod payload;
pub mod render;
pub mod severity;

pub use canonicalize::canonicalize;
pub use catalog::{Catalog, MultiNodeCatalog, NodeOrder};
pub use entity::{Entity, EntityKind, PayloadShape};
pub use error::ParseError;
pub use payload::{AgentOutput, RawPayload, Section};
pub use severity::Severity;
