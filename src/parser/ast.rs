// Abstract Syntax Tree for the mapping override DSL

/// Complete override: every `role: target` pair in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappingOverride {
    pub bindings: Vec<Binding>,
}

impl MappingOverride {
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// One `role: target` pair
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub role: RoleName,
    pub target: Target,
}

/// Visual role being overridden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleName {
    X,
    Y,
    Z,
    Color,
    Size,
    Category,
}

/// What a role is bound to
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Column name (bare identifier or double-quoted)
    Column(String),
    /// Row position
    Index,
    /// Constant 1
    Count,
}
