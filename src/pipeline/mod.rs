pub mod chart;
pub mod densify;
pub mod distance;
pub mod metrics;
pub mod parse;
pub mod simplify;
