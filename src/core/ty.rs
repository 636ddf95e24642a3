//! Core types: the typed schema every value and lowering decision is
//! checked against. Mirrors spec.md §3's "Type" variant list exactly.

/// Primitive (unstructured) types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimType {
    Bool,
    Char,
    Int,
    Real,
    String,
    Unit,
}

/// A named constructor of a [`DataType`], with an optional argument type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctor {
    pub name: String,
    pub arg: Option<Box<Type>>,
}

/// A sum-of-constructors datatype. `is_collection` distinguishes bag-like
/// datatypes (e.g. a user-defined multiset wrapper) from ordinary sums.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataType {
    pub name: String,
    pub ctors: Vec<Ctor>,
    pub is_collection: bool,
}

/// A core type.
///
/// `Record` fields are ordered by field name: this is an invariant the
/// constructor is responsible for (see [`Type::record`]), not something
/// re-checked on every use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Prim(PrimType),
    Tuple(Vec<Type>),
    Record(Vec<(String, Type)>),
    List(Box<Type>),
    Bag(Box<Type>),
    Data(DataType),
    Fun(Box<Type>, Box<Type>),
}

impl Type {
    /// Build a record type, normalizing field order to name-sorted.
    pub fn record(mut fields: Vec<(String, Type)>) -> Type {
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        Type::Record(fields)
    }

    /// Bag-like datatypes and the `Bag` variant itself are unordered
    /// multisets; everything else (including `List`) is ordered.
    pub fn is_collection(&self) -> bool {
        match self {
            Type::Bag(_) => true,
            Type::Data(d) => d.is_collection,
            _ => false,
        }
    }

    pub fn as_record(&self) -> Option<&[(String, Type)]> {
        match self {
            Type::Record(fields) => Some(fields),
            _ => None,
        }
    }
}
