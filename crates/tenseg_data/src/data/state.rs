use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

/// Locomotion state of a fabric instance.
///
/// `Rest` is the initial state and every state is reachable from every
/// other; gait feasibility is policy for the behavior layer, not the
/// machine itself.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
#[archive_attr(derive(Debug, PartialEq, Eq, Hash))]
pub enum Direction {
    /// Settled, no gait active.
    #[default]
    Rest,
    /// Forward gait.
    Forward,
    /// Left turn gait.
    TurnLeft,
    /// Right turn gait.
    TurnRight,
    /// Reverse gait.
    Reverse,
}

impl Direction {
    /// All directions, in tag order.
    pub const ALL: [Direction; 5] = [
        Direction::Rest,
        Direction::Forward,
        Direction::TurnLeft,
        Direction::TurnRight,
        Direction::Reverse,
    ];

    /// Number of locomotion states.
    pub const COUNT: usize = 5;
}

/// Engine-wide physical scalar, applied uniformly across all instances.
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
pub enum GlobalFeature {
    /// Gravity applied above the surface.
    GravityAbove,
    /// Gravity applied below land.
    GravityBelowLand,
    /// Gravity applied below water.
    GravityBelowWater,
    /// Drag applied above the surface.
    DragAbove,
    /// Drag applied below land.
    DragBelowLand,
    /// Drag applied below water.
    DragBelowWater,
    /// Interpolation speed toward per-state rest lengths.
    LengthVariationSpeed,
    /// Elastic factor for push members.
    PushElastic,
    /// Elastic factor for pull members.
    PullElastic,
}

impl GlobalFeature {
    /// All features, in declaration order.
    pub const ALL: [GlobalFeature; 9] = [
        GlobalFeature::GravityAbove,
        GlobalFeature::GravityBelowLand,
        GlobalFeature::GravityBelowWater,
        GlobalFeature::DragAbove,
        GlobalFeature::DragBelowLand,
        GlobalFeature::DragBelowWater,
        GlobalFeature::LengthVariationSpeed,
        GlobalFeature::PushElastic,
        GlobalFeature::PullElastic,
    ];

    /// Stable name, used as the configuration key.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GlobalFeature::GravityAbove => "gravity-above",
            GlobalFeature::GravityBelowLand => "gravity-below-land",
            GlobalFeature::GravityBelowWater => "gravity-below-water",
            GlobalFeature::DragAbove => "drag-above",
            GlobalFeature::DragBelowLand => "drag-below-land",
            GlobalFeature::DragBelowWater => "drag-below-water",
            GlobalFeature::LengthVariationSpeed => "length-variation-speed",
            GlobalFeature::PushElastic => "push-elastic",
            GlobalFeature::PullElastic => "pull-elastic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_is_default() {
        assert_eq!(Direction::default(), Direction::Rest);
    }

    #[test]
    fn test_direction_count_matches_all() {
        assert_eq!(Direction::ALL.len(), Direction::COUNT);
    }

    #[test]
    fn test_feature_names_unique() {
        let mut names: Vec<_> = GlobalFeature::ALL.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), GlobalFeature::ALL.len());
    }
}
