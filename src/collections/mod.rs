//! Task and note collections. Every operation borrows the current collection and hands back a
//! new one; the owner decides when the new value replaces the persisted one.

use anyhow::{bail, Result};
use uuid::Uuid;

pub mod notes;
pub mod tasks;

/// Finds the single id starting with `prefix`. Ids are compared in their hyphen-free form,
/// so both [short_id] output and full hyphenated ids resolve.
pub(crate) fn resolve_prefix(
    ids: impl IntoIterator<Item = Uuid>,
    prefix: &str,
    kind: &str,
) -> Result<Uuid> {
    let prefix = prefix.trim().replace('-', "").to_ascii_lowercase();
    if prefix.is_empty() {
        bail!("Expected a {kind} id");
    }
    let mut matches = ids
        .into_iter()
        .filter(|id| id.simple().to_string().starts_with(&prefix));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => bail!("No {kind} matches id `{prefix}`"),
        (Some(_), Some(_)) => bail!("Id `{prefix}` matches more than one {kind}"),
    }
}

/// Short form of an id used in listings.
pub fn short_id(id: &Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}
