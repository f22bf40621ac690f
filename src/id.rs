//! Manages entity ID allocation.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU32, Ordering};

/// The atomic counter that allocates entity IDs.
///
/// A document owns exactly one source and passes it to every registry it creates,
/// so that IDs stay unique across entity kinds.
/// Allocation never takes a lock; it is a single atomic increment.
#[derive(Debug, Default)]
pub struct IdSource {
    /// The last ID handed out, or `0` if none.
    last: AtomicU32,
}

impl IdSource {
    /// Creates a source that will allocate `1` next.
    pub fn new() -> Self { Self::default() }

    /// Creates a source resuming after `last`, typically restored from a saved document.
    pub fn starting_after(last: u32) -> Self { Self { last: AtomicU32::new(last) } }

    /// Allocates the next ID.
    ///
    /// # Panics
    /// Panics if the ID space is exhausted.
    pub fn next(&self) -> u32 {
        let previous = self.last.fetch_add(1, Ordering::SeqCst);
        previous.checked_add(1).expect("entity id space exhausted")
    }

    /// Returns the last allocated ID.
    pub fn last(&self) -> u32 { self.last.load(Ordering::SeqCst) }

    /// Overwrites the last allocated ID.
    pub fn set_last(&self, last: u32) { self.last.store(last, Ordering::SeqCst) }

    /// Ensures the next allocated ID is greater than `id`.
    pub fn raise_to(&self, id: u32) { self.last.fetch_max(id, Ordering::SeqCst); }

    /// Restarts allocation from `1`.
    ///
    /// Must not race with concurrent allocations,
    /// and must be called once per document reset rather than once per registry.
    pub fn reset(&self) { self.set_last(0) }
}

/// Parses a comma-separated list of IDs, such as `"12, 45,46"`.
///
/// Invalid tokens are logged and skipped.
pub fn parse_ids(list: &str) -> BTreeSet<u32> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse() {
            Ok(id) => Some(id),
            Err(err) => {
                log::warn!("Ignoring invalid id {token:?} ({err})");
                None
            }
        })
        .collect()
}
