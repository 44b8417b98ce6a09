//! Axis-aligned box overlap and contact classification
//!
//! Boxes are `(pos, size)` pairs in world space with y growing downward.

use glam::Vec2;

use super::state::Platform;

/// How a moving box met a solid platform, judged from where it was last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Previous bottom edge was at or above the platform top
    Landing,
    /// Previous top edge was at or below the platform bottom
    Ceiling,
    /// Anything else: the box came in from the left or right
    Side,
}

/// Strict AABB overlap test. Touching edges do not overlap.
#[inline]
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

/// Test a box against a platform
#[inline]
pub fn overlaps_platform(pos: Vec2, size: Vec2, platform: &Platform) -> bool {
    aabb_overlap(pos, size, platform.pos, platform.size)
}

/// Classify a contact using only the previous vertical span.
///
/// Corner hits where the box was neither fully above nor fully below are
/// treated as side contacts, even when the box is mostly moving vertically.
pub fn classify_contact(prev_pos: Vec2, size: Vec2, platform: &Platform) -> Contact {
    if prev_pos.y + size.y <= platform.top() {
        Contact::Landing
    } else if prev_pos.y >= platform.bottom() {
        Contact::Ceiling
    } else {
        Contact::Side
    }
}
