//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are domain objects that are **immutable** and **compared by
/// value**: a `DocumentVersion` or a `Signature` is defined entirely by its
/// attributes, unlike a `Document`, which keeps its identity across state
/// changes.
///
/// To "modify" a value object, create a new one with the new values. This is
/// what makes version and signature lists append-only: the list grows, the
/// entries never change.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
