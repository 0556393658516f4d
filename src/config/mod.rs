//! Pipeline configuration.
//!
//! All environment knowledge (CMS origin, public hostname, media prefix) is
//! supplied here explicitly; the pipeline itself never sniffs its runtime
//! environment.

mod builder;
mod types;

pub use builder::ResolverConfigBuilder;
pub use types::ResolverConfig;
