//! Behavior modulation: genome-driven span variation per locomotion state.
//!
//! One application pass walks the live intervals in slot order, skipping
//! the structural members created during gestation, and draws exactly one
//! gene choice per visited interval. The choice selects a span factor that
//! becomes the interval's target for the currently active direction; the
//! numeric engine interpolates the actual rest length toward it at the
//! length-variation-speed feature's rate.

use tenseg_data::Genome;

use crate::error::Result;
use crate::fabric::Fabric;
use crate::genome::{GenePolicy, GeneReader};

/// Lower bound of the span factor range.
const SPAN_FACTOR_MIN: f32 = 0.5;
/// Upper bound of the span factor range.
const SPAN_FACTOR_MAX: f32 = 1.5;

/// Outcome of one behavior application pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BehaviorSummary {
    /// Intervals that received an assignment (one gene read each).
    pub visited: usize,
    /// Structural intervals skipped without a gene read.
    pub skipped: usize,
}

/// Maps a bucketed gene choice onto the span factor range.
#[must_use]
pub fn span_factor(choice: usize, buckets: usize) -> f32 {
    debug_assert!(buckets >= 2, "bucket count must be at least 2");
    debug_assert!(choice < buckets, "choice out of bucket range");
    let fraction = choice as f32 / (buckets - 1) as f32;
    SPAN_FACTOR_MIN + fraction * (SPAN_FACTOR_MAX - SPAN_FACTOR_MIN)
}

/// Applies one behavior pass for the instance's active direction.
///
/// A gestating instance is still growing; the pass is suppressed and
/// returns an empty summary. The gene cursor advances by exactly one read
/// per visited interval, never skipping and never re-reading, so two passes
/// over the same untouched instance assign identically.
pub fn apply_behavior(
    fabric: &mut Fabric,
    genome: &Genome,
    policy: GenePolicy,
    buckets: usize,
) -> Result<BehaviorSummary> {
    if fabric.is_gestating() {
        tracing::debug!(age = fabric.age(), "Behavior pass suppressed during gestation");
        return Ok(BehaviorSummary::default());
    }
    let direction = fabric.direction();
    let mut reader = GeneReader::new(genome, policy);
    let mut summary = BehaviorSummary::default();
    let intervals: Vec<_> = fabric
        .intervals()
        .map(|(id, interval)| (id, interval.behavior_exempt()))
        .collect();
    for (id, exempt) in intervals {
        if exempt {
            summary.skipped += 1;
            continue;
        }
        let choice = reader.read_choice(buckets)?;
        fabric.set_state_factor(id, direction, span_factor(choice, buckets))?;
        summary.visited += 1;
    }
    tracing::trace!(
        direction = ?direction,
        visited = summary.visited,
        skipped = summary.skipped,
        "Behavior pass applied"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use crate::store::TagGenerator;
    use tenseg_data::{Direction, IntervalRole, Laterality};

    fn muscle_fabric(intervals: usize) -> Fabric {
        let mut tags = TagGenerator::new();
        let mut fabric = Fabric::new(32, 32, 8);
        for i in 0..=intervals {
            fabric
                .create_joint(tags.next_tag(), Laterality::Middle, i as f32, 0.0, 0.0)
                .unwrap();
        }
        for i in 0..intervals {
            fabric
                .create_interval(i, i + 1, IntervalRole::Triangle, 1.0)
                .unwrap();
        }
        fabric
    }

    #[test]
    fn test_span_factor_bounds() {
        assert_eq!(span_factor(0, 16), 0.5);
        assert_eq!(span_factor(15, 16), 1.5);
        let middle = span_factor(8, 17);
        assert!((middle - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pass_visits_each_interval_once() {
        let mut fabric = muscle_fabric(5);
        let genome = Genome::new(vec![3; 8]);
        let summary = apply_behavior(&mut fabric, &genome, GenePolicy::Fail, 16).unwrap();
        assert_eq!(summary.visited, 5);
        assert_eq!(summary.skipped, 0);
    }

    #[test]
    fn test_pass_skips_structural_intervals() {
        let mut tags = TagGenerator::new();
        let mut fabric = Fabric::new(8, 8, 4);
        for i in 0..3 {
            fabric
                .create_joint(tags.next_tag(), Laterality::Middle, i as f32, 0.0, 0.0)
                .unwrap();
        }
        fabric.set_gestating(1);
        let structural = fabric
            .create_interval(0, 1, IntervalRole::NexusPush, 1.6)
            .unwrap();
        fabric.advance(1);
        fabric
            .create_interval(1, 2, IntervalRole::Triangle, 1.0)
            .unwrap();
        let genome = Genome::new(vec![15]);
        let summary = apply_behavior(&mut fabric, &genome, GenePolicy::Fail, 16).unwrap();
        assert_eq!(summary.visited, 1);
        assert_eq!(summary.skipped, 1);
        // The structural interval keeps its neutral factor.
        assert_eq!(
            fabric
                .interval(structural)
                .unwrap()
                .state_factor(Direction::Rest),
            1.0
        );
    }

    #[test]
    fn test_gestating_fabric_suppresses_pass() {
        let mut fabric = muscle_fabric(3);
        fabric.set_gestating(5);
        let genome = Genome::new(vec![1, 2, 3]);
        let summary = apply_behavior(&mut fabric, &genome, GenePolicy::Fail, 16).unwrap();
        assert_eq!(summary, BehaviorSummary::default());
    }

    #[test]
    fn test_exhaustion_fails_under_fail_policy() {
        let mut fabric = muscle_fabric(4);
        let genome = Genome::new(vec![1, 2]);
        assert!(matches!(
            apply_behavior(&mut fabric, &genome, GenePolicy::Fail, 16),
            Err(KernelError::GeneExhausted { .. })
        ));
    }

    #[test]
    fn test_exhaustion_wraps_under_wrap_policy() {
        let mut fabric = muscle_fabric(4);
        let genome = Genome::new(vec![0, 15]);
        apply_behavior(&mut fabric, &genome, GenePolicy::Wrap, 16).unwrap();
        let factors: Vec<_> = fabric
            .intervals()
            .map(|(_, interval)| interval.state_factor(Direction::Rest))
            .collect();
        assert_eq!(factors[0], factors[2]);
        assert_eq!(factors[1], factors[3]);
        assert_ne!(factors[0], factors[1]);
    }

    #[test]
    fn test_two_passes_assign_identically() {
        let genome = Genome::new(vec![7, 1, 12, 4, 9, 0, 14, 3]);
        let collect = |fabric: &Fabric| -> Vec<f32> {
            fabric
                .intervals()
                .map(|(_, interval)| interval.state_factor(Direction::Rest))
                .collect()
        };
        let mut first = muscle_fabric(6);
        apply_behavior(&mut first, &genome, GenePolicy::Fail, 16).unwrap();
        let mut second = muscle_fabric(6);
        apply_behavior(&mut second, &genome, GenePolicy::Fail, 16).unwrap();
        assert_eq!(collect(&first), collect(&second));
    }
}
