//! One function per metric family. Each returns every matching entity;
//! narrowing to a single broker happens in the resolution layer.

pub mod broker;
pub mod cluster;
pub mod helpers;
pub mod series;
pub mod topic;

pub use series::RequestKind;
