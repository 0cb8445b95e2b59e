//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. Two price records with the same fields are equal values
//! but may still be distinct occurrences in a price list.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new value (e.g. a resolved price is a new value derived from a
/// stored record plus a flag).
///
/// The trait requires:
/// - **Clone**: values are copied, not shared by reference
/// - **PartialEq**: compared by attribute values
/// - **Debug**: helpful for logging and tests
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Money {
///     amount: Decimal,
///     currency: String,
/// }
///
/// impl ValueObject for Money {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
