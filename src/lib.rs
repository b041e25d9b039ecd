//! Replacer - placeholder substitution with pluggable processors
//!
//! ```
//! use replacer::{ReplacementMap, Replacer};
//!
//! let engine = Replacer::new();
//! let vars = ReplacementMap::new()
//!     .with_literal("name", "ada")
//!     .with_producer("sum", |args| {
//!         args.unwrap_or_default()
//!             .iter()
//!             .filter_map(|a| a.parse::<i64>().ok())
//!             .sum::<i64>()
//!             .to_string()
//!     });
//!
//! let out = engine.replace("{{name|capitalize}} owes {{sum:1200,34|number:0,.,_}}", &vars);
//! assert_eq!(out, "Ada owes 1_234");
//! ```

pub mod config;
pub mod error;
pub mod processor;
pub mod replacement;
pub mod replacer;
pub mod tag;

pub use config::ReplacerConfig;
pub use error::{FixSuggestion, ProcessorError, ReplacerError};
pub use processor::{Processor, ProcessorRegistry};
pub use replacement::{Producer, Replacement, ReplacementMap};
pub use replacer::{ResolvedTag, Replacer};
pub use tag::Tag;
