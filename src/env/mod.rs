//! The immutable lexical environment and the traversal infrastructure
//! built on top of it (C1–C4).

pub mod binding;
pub mod environment;
pub mod name_generator;
pub mod ref_checker;
pub mod visitor;

pub use binding::{Binding, BindingKind};
pub use environment::Environment;
pub use name_generator::NameGenerator;
pub use ref_checker::{check_refs, RefError};
pub use visitor::{walk_expr, EnvSink};
