use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

/// Structural category of an interval.
///
/// Every role fixes a canonical rest length, derived in `tenseg_core::role`
/// from the golden ratio and the square roots of 2, 3 and 5. The enum is
/// closed: a tag outside this set is a schema mismatch, never a default.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
#[archive_attr(derive(Debug, PartialEq, Eq, Hash))]
pub enum IntervalRole {
    /// Push bar inside a nexus twist.
    NexusPush,
    /// Push bar inside a column twist.
    ColumnPush,
    /// Pull along a triangle side.
    Triangle,
    /// Pull along a ring segment.
    Ring,
    /// Pull crossing between twist layers.
    Cross,
    /// Middle segment of a bow.
    BowMid,
    /// End segment of a bow.
    BowEnd,
    /// Push member of a ribbon.
    RibbonPush,
    /// Short pull member of a ribbon.
    RibbonShort,
    /// Long pull member of a ribbon.
    RibbonLong,
    /// Hanger suspending a growing structure.
    Hanger,
}

impl IntervalRole {
    /// All roles, in tag order.
    pub const ALL: [IntervalRole; 11] = [
        IntervalRole::NexusPush,
        IntervalRole::ColumnPush,
        IntervalRole::Triangle,
        IntervalRole::Ring,
        IntervalRole::Cross,
        IntervalRole::BowMid,
        IntervalRole::BowEnd,
        IntervalRole::RibbonPush,
        IntervalRole::RibbonShort,
        IntervalRole::RibbonLong,
        IntervalRole::Hanger,
    ];

    /// Stable name, used as the key for per-install length overrides.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            IntervalRole::NexusPush => "nexus-push",
            IntervalRole::ColumnPush => "column-push",
            IntervalRole::Triangle => "triangle",
            IntervalRole::Ring => "ring",
            IntervalRole::Cross => "cross",
            IntervalRole::BowMid => "bow-mid",
            IntervalRole::BowEnd => "bow-end",
            IntervalRole::RibbonPush => "ribbon-push",
            IntervalRole::RibbonShort => "ribbon-short",
            IntervalRole::RibbonLong => "ribbon-long",
            IntervalRole::Hanger => "hanger",
        }
    }

    /// Wire tag of this role.
    #[must_use]
    pub fn tag(&self) -> u8 {
        IntervalRole::ALL
            .iter()
            .position(|r| r == self)
            .expect("role present in ALL") as u8
    }
}

/// Bilateral position of a joint, used for mirrored structure generation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
#[archive_attr(derive(Debug, PartialEq, Eq, Hash))]
pub enum Laterality {
    /// On the mirror plane.
    Middle,
    /// Right of the mirror plane.
    RightSide,
    /// Left of the mirror plane.
    LeftSide,
}

impl Laterality {
    /// The mirrored side; `Middle` is its own mirror.
    #[must_use]
    pub fn opposite(&self) -> Laterality {
        match self {
            Laterality::Middle => Laterality::Middle,
            Laterality::RightSide => Laterality::LeftSide,
            Laterality::LeftSide => Laterality::RightSide,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_tags_are_dense() {
        for (i, role) in IntervalRole::ALL.iter().enumerate() {
            assert_eq!(role.tag() as usize, i);
        }
    }

    #[test]
    fn test_role_names_unique() {
        let mut names: Vec<_> = IntervalRole::ALL.iter().map(|r| r.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), IntervalRole::ALL.len());
    }

    #[test]
    fn test_laterality_opposite_involution() {
        for side in [Laterality::Middle, Laterality::RightSide, Laterality::LeftSide] {
            assert_eq!(side.opposite().opposite(), side);
        }
    }
}
