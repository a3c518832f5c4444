pub mod compiler;
pub mod domain_trie;
pub mod engine;
pub mod snapshot;

pub use compiler::{build_snapshot, RuleCompiler, RuleSet};
pub use engine::FilterEngine;
pub use snapshot::FilterSnapshot;
