//! Type aliases for operations that support partial success.

/// Represents a successful operation where some parts failed but didn't prevent overall success.
/// The `Vec<E>` contains errors from the failed parts that were handled gracefully.
pub type PartialSuccess<T, E> = ( T, Vec<E> );
