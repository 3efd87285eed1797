//! Player identity resolution.
//!
//! The arena feeds expose a player's identity under different fields
//! depending on the payload shape (`username`, a nested `user.name`, a bare
//! `name`, a `userId`). Every lookup goes through this one resolver, in a
//! fixed priority order, so a new payload shape needs exactly one change.

/// Return the first candidate that is present and non-empty after trimming.
pub fn resolve_player<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
}
