//! SINAG governance assessment service.
//!
//! The core is the indicator calculation rule engine
//! ([`assessment::calculation`]): a pure evaluator that derives Pass/Fail
//! statuses from authored condition groups and submitted form values. The
//! surrounding modules wire the engine to an indicator registry, an HTTP
//! API, and a batch re-validation job.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
