//! Read and mutate decisions for owned resources.
//!
//! Reads are open to everyone, including anonymous callers. Mutation is
//! reserved for the resource owner.

use super::UserId;

/// A resource with exactly one owning user.
pub trait Owned {
    /// Identifier of the user who created the resource.
    fn owner_id(&self) -> &UserId;
}

/// Whether `actor` may read `resource`. Always true.
pub fn can_read<R: Owned + ?Sized>(_actor: Option<&UserId>, _resource: &R) -> bool {
    true
}

/// Whether `actor` may mutate or delete `resource`.
///
/// # Examples
/// ```
/// use jokes::domain::{can_mutate, Owned, UserId};
///
/// struct Note(UserId);
/// impl Owned for Note {
///     fn owner_id(&self) -> &UserId {
///         &self.0
///     }
/// }
///
/// let owner = UserId::random();
/// let note = Note(owner);
/// assert!(can_mutate(Some(&owner), &note));
/// assert!(!can_mutate(Some(&UserId::random()), &note));
/// assert!(!can_mutate(None, &note));
/// ```
pub fn can_mutate<R: Owned + ?Sized>(actor: Option<&UserId>, resource: &R) -> bool {
    actor.is_some_and(|actor| actor == resource.owner_id())
}
