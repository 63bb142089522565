//! Quote cost composition for contracted security services.
//!
//! The crate turns a quote's priced line items (staffing positions, uniforms,
//! medical exams, meals, ancillary equipment, vehicles, infrastructure) into a
//! monthly cost figure and a monthly sale price, resolving tenant catalog
//! defaults along the way. Storage and catalog lookup stay behind traits so
//! the engine itself is pure computation over in-memory data.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
