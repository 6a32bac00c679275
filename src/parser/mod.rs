// Mapping override DSL parser

pub mod ast;
pub mod lexer;
pub mod mapping;

// Public API re-exports
pub use ast::{Binding, MappingOverride, RoleName, Target};
pub use mapping::{parse_mapping, parse_mapping_override};
