//! Identifier and overload-group handles shared by the core AST and the
//! environment (C1).

/// A name together with the ordinal that disambiguates repeated bindings
/// of the same name within one compilation (the "identifier-with-ordinal"
/// of spec.md §4.1).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Id {
    pub name: String,
    pub ordinal: u32,
}

impl Id {
    pub fn new(name: impl Into<String>, ordinal: u32) -> Self {
        Id { name: name.into(), ordinal }
    }

    /// Ordinal-0 convenience constructor, used for user-written source
    /// identifiers that have not been disambiguated.
    pub fn plain(name: impl Into<String>) -> Self {
        Id::new(name, 0)
    }
}

/// Identifies one overload group: bindings that share a surface name but
/// are distinguished by argument type. `name` is the user-visible
/// overloaded name (e.g. `"+"`); `group` is a unique handle for this
/// particular overload family.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OverloadId {
    pub name: String,
    pub group: u32,
}
