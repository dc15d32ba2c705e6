//! Expand `@opsmxAuthRule(...)` markers in a Dgraph GraphQL schema into `@auth`
//! rule entries, append the `# Dgraph.Authorization` object, and upload the
//! result to Dgraph.

pub mod assembler;
pub mod classifier;
pub mod config;
pub mod directive;
pub mod error;
pub mod publish;
pub mod rule;

pub use assembler::{transform, SchemaAssembler, DGRAPH_AUTHORIZATION};
pub use config::{Cli, Config};
pub use directive::Directive;
pub use error::{ConfigError, DirectiveError, TransformError};
pub use publish::{run, RunOutcome, SchemaPublisher};
