#![doc = "Administrative boundary import pipeline"]
pub mod cli;
pub mod commands;
pub mod feature;
pub mod group;
pub mod key;
pub mod merge;
pub mod pacer;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod shape;
pub mod split;
pub mod store;

#[doc(inline)]
pub use key::{AdminKey, ExistingKeySet};

#[doc(inline)]
pub use pipeline::{ImportConfig, run_import};

#[doc(inline)]
pub use record::BoundaryRecord;

#[doc(inline)]
pub use report::RunResult;
