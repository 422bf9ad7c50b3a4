//! UUID v7 utilities for time-ordered identifiers.
//!
//! Entity ids are UUIDv7, which embeds a millisecond Unix timestamp in the
//! high bits. Ids therefore sort in creation order, which is what breaks
//! display_order ties: two rows with equal display_order list in the order
//! they were created.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// Check if a UUID is version 7.
#[inline]
pub fn is_v7(uuid: &Uuid) -> bool {
    uuid.get_version_num() == 7
}
