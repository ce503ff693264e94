//! Type identifiers for record kinds.

/// Trait for record types that can be captured in a [`Snapshot`](super::Snapshot)
/// and rebuilt from one.
///
/// The identifier is stored as the snapshot `type` and used to find the
/// directory that rebuilds the record. Snapshots are only rebuilt under
/// the exact identifier they were written with.
///
/// # Example
///
/// ```
/// use tessera::record::Registered;
///
/// struct Page;
///
/// impl Registered for Page {
///     fn type_id() -> &'static str {
///         "page"
///     }
/// }
///
/// assert_eq!(Page::type_id(), "page");
/// ```
pub trait Registered {
    /// Returns the identifier written into snapshots of this type.
    fn type_id() -> &'static str;
}
