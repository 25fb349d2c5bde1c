//! Tool implementations, one router per family.

mod charts;
mod data;
mod metrics;
