//! Literal-rewrite engine.
//!
//! A file goes through three steps:
//!
//! 1. **Parse** (`parsers`): swc builds the AST; the syntax follows the file extension.
//! 2. **Scan** (`scanner`): a read-only traversal decides, per string or template
//!    literal, whether to rewrite it (`exclusion`), where it sits (`locator`) and
//!    what replaces it (`rewrite`, `template`). Keys go into the `registry`.
//! 3. **Emit** (`emit`): the plan, plus at most one dependency statement
//!    (`dependency`), is spliced into the original text with a source map.

pub mod ancestry;
pub mod dependency;
pub mod emit;
pub mod exclusion;
pub mod file_scanner;
pub mod locator;
pub mod occurrence;
pub mod parsers;
pub mod registry;
pub mod rewrite;
pub mod scanner;
pub mod template;
pub mod transform;
pub mod whitespace;

pub use dependency::{DependencyConfig, DependencyState, ModuleSystem};
pub use occurrence::{LiteralKind, Occurrence};
pub use registry::{KeyConflict, KeyRegistry, KeyStrategy, KeyStyle, Md5Keys, TextKeys};
pub use transform::{FileReport, RewriteRecord, TransformConfig, TransformOutput, transform};
