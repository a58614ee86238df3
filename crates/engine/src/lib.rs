pub mod check;
pub mod config;
pub mod evaluator;
pub mod reconcile;

pub use check::{CheckContext, CheckParams, Finding, Levels, Metric, ThresholdSpec, Verdict};
pub use config::{load_from_file, load_from_str, EngineConfig, LoadError};
pub use evaluator::{discover, CycleInput, Evaluator, ServiceReport};
pub use reconcile::{ReconcileMode, Reconciler};
