//! A single fabric instance: joints, intervals, faces and its locomotion
//! state.
//!
//! Joints are dense indices and are never removed individually; only a
//! whole-instance [`Fabric::reset`] reclaims them. Intervals and faces live
//! in generational slot arenas: removal frees the slot and bumps its
//! generation, so any retained id fails with a stale-id error instead of
//! silently addressing a different element after the slot is reused.

use tenseg_data::{Direction, IntervalRole, Laterality};

use crate::direction::DirectionLogic;
use crate::error::{KernelError, Result};

/// Process-unique provenance id for a joint.
///
/// Tags are minted only by the store's monotonic generator and are never
/// reused, even after an instance reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JointTag(u64);

impl JointTag {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw tag value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A point mass node in the structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    tag: JointTag,
    laterality: Laterality,
    location: [f32; 3],
}

impl Joint {
    /// Provenance tag supplied at creation.
    #[must_use]
    pub fn tag(&self) -> JointTag {
        self.tag
    }

    /// Bilateral position of this joint.
    #[must_use]
    pub fn laterality(&self) -> Laterality {
        self.laterality
    }

    /// Seed location supplied at creation.
    #[must_use]
    pub fn location(&self) -> [f32; 3] {
        self.location
    }
}

/// A push or pull member connecting two joints.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    alpha: usize,
    omega: usize,
    role: IntervalRole,
    rest_length: f32,
    state_factors: [f32; Direction::COUNT],
    behavior_exempt: bool,
}

impl Interval {
    /// Alpha joint index.
    #[must_use]
    pub fn alpha(&self) -> usize {
        self.alpha
    }

    /// Omega joint index.
    #[must_use]
    pub fn omega(&self) -> usize {
        self.omega
    }

    /// Structural role.
    #[must_use]
    pub fn role(&self) -> IntervalRole {
        self.role
    }

    /// Current rest length; the primary actuation target.
    #[must_use]
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// Span factor targeted while the given locomotion state is active.
    #[must_use]
    pub fn state_factor(&self, direction: Direction) -> f32 {
        self.state_factors[direction.index()]
    }

    /// Whether this interval was created during gestation and is exempt
    /// from behavioral modulation.
    #[must_use]
    pub fn behavior_exempt(&self) -> bool {
        self.behavior_exempt
    }
}

/// A triangle over exactly three joints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    joints: [usize; 3],
}

impl Face {
    /// The three joint indices, in winding order.
    #[must_use]
    pub fn joints(&self) -> [usize; 3] {
        self.joints
    }
}

/// Generational handle to an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntervalId {
    index: u32,
    generation: u32,
}

impl IntervalId {
    /// Slot index, for diagnostics only.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Generational handle to a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceId {
    index: u32,
    generation: u32,
}

impl FaceId {
    /// Slot index, for diagnostics only.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Fixed-capacity slot arena with generation counters.
///
/// Freed slots are reused by later inserts; the generation bump on removal
/// turns stale external references into explicit errors.
#[derive(Debug, Clone, PartialEq)]
struct Arena<T> {
    what: &'static str,
    capacity: usize,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Arena<T> {
    fn new(what: &'static str, capacity: usize) -> Self {
        Self {
            what,
            capacity,
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    fn len(&self) -> usize {
        self.live
    }

    fn insert(&mut self, value: T) -> Result<(u32, u32)> {
        if self.live >= self.capacity {
            return Err(KernelError::capacity(self.what, self.capacity));
        }
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return Ok((index, slot.generation));
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        Ok((index, 0))
    }

    fn get(&self, index: u32, generation: u32) -> Result<&T> {
        let slot = self
            .slots
            .get(index as usize)
            .ok_or(KernelError::invalid_index(self.what, index as usize))?;
        if slot.generation != generation {
            return Err(KernelError::stale(self.what, index as usize));
        }
        slot.value
            .as_ref()
            .ok_or(KernelError::stale(self.what, index as usize))
    }

    fn get_mut(&mut self, index: u32, generation: u32) -> Result<&mut T> {
        let slot = self
            .slots
            .get_mut(index as usize)
            .ok_or(KernelError::invalid_index(self.what, index as usize))?;
        if slot.generation != generation {
            return Err(KernelError::stale(self.what, index as usize));
        }
        slot.value
            .as_mut()
            .ok_or(KernelError::stale(self.what, index as usize))
    }

    fn remove(&mut self, index: u32, generation: u32) -> Result<T> {
        let value = {
            let slot = self
                .slots
                .get_mut(index as usize)
                .ok_or(KernelError::invalid_index(self.what, index as usize))?;
            if slot.generation != generation {
                return Err(KernelError::stale(self.what, index as usize));
            }
            let value = slot
                .value
                .take()
                .ok_or(KernelError::stale(self.what, index as usize))?;
            slot.generation += 1;
            value
        };
        self.free.push(index);
        self.live -= 1;
        Ok(value)
    }

    fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (index as u32, slot.generation, value))
        })
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

/// One complete structure simulation.
#[derive(Debug, Clone)]
pub struct Fabric {
    max_joints: usize,
    joints: Vec<Joint>,
    intervals: Arena<Interval>,
    faces: Arena<Face>,
    age: u64,
    gestation: u64,
    direction: Direction,
    next_direction: Direction,
}

impl Fabric {
    /// Creates an empty instance with the given capacity bounds.
    #[must_use]
    pub fn new(max_joints: usize, max_intervals: usize, max_faces: usize) -> Self {
        Self {
            max_joints,
            joints: Vec::new(),
            intervals: Arena::new("interval", max_intervals),
            faces: Arena::new("face", max_faces),
            age: 0,
            gestation: 0,
            direction: Direction::Rest,
            next_direction: Direction::Rest,
        }
    }

    /// Clears joints, intervals, faces and counters. Capacity is kept.
    pub fn reset(&mut self) {
        self.joints.clear();
        self.intervals.clear();
        self.faces.clear();
        self.age = 0;
        self.gestation = 0;
        self.direction = Direction::Rest;
        self.next_direction = Direction::Rest;
    }

    // --- joints ---

    /// Allocates a joint, returning its dense index.
    pub fn create_joint(
        &mut self,
        tag: JointTag,
        laterality: Laterality,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<usize> {
        if self.joints.len() >= self.max_joints {
            return Err(KernelError::capacity("joint", self.max_joints));
        }
        self.joints.push(Joint {
            tag,
            laterality,
            location: [x, y, z],
        });
        Ok(self.joints.len() - 1)
    }

    /// Live joint count.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Looks up a joint by dense index.
    pub fn joint(&self, index: usize) -> Result<&Joint> {
        self.joints
            .get(index)
            .ok_or(KernelError::invalid_index("joint", index))
    }

    // --- intervals ---

    /// Creates an interval between two existing joints.
    ///
    /// The rest length is resolved by the caller from the role table (with
    /// overrides applied). Intervals created while the instance is
    /// gestating are structural and exempt from behavioral modulation.
    pub fn create_interval(
        &mut self,
        alpha: usize,
        omega: usize,
        role: IntervalRole,
        rest_length: f32,
    ) -> Result<IntervalId> {
        self.joint(alpha)?;
        self.joint(omega)?;
        let behavior_exempt = self.is_gestating();
        let (index, generation) = self.intervals.insert(Interval {
            alpha,
            omega,
            role,
            rest_length,
            state_factors: [1.0; Direction::COUNT],
            behavior_exempt,
        })?;
        Ok(IntervalId { index, generation })
    }

    /// Live interval count.
    #[must_use]
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Looks up an interval by id.
    pub fn interval(&self, id: IntervalId) -> Result<&Interval> {
        self.intervals.get(id.index, id.generation)
    }

    /// Mutates an interval's immediate rest length.
    pub fn change_rest_length(&mut self, id: IntervalId, rest_length: f32) -> Result<()> {
        self.intervals.get_mut(id.index, id.generation)?.rest_length = rest_length;
        Ok(())
    }

    /// Reassigns an interval's role and rest length together.
    pub fn change_interval_role(
        &mut self,
        id: IntervalId,
        role: IntervalRole,
        rest_length: f32,
    ) -> Result<()> {
        let interval = self.intervals.get_mut(id.index, id.generation)?;
        interval.role = role;
        interval.rest_length = rest_length;
        Ok(())
    }

    /// Sets the span factor an interval targets while `direction` is active.
    pub fn set_state_factor(
        &mut self,
        id: IntervalId,
        direction: Direction,
        factor: f32,
    ) -> Result<()> {
        self.intervals
            .get_mut(id.index, id.generation)?
            .state_factors[direction.index()] = factor;
        Ok(())
    }

    /// Removes an interval. The slot may be reused by a later create; the
    /// removed id stays invalid forever.
    pub fn remove_interval(&mut self, id: IntervalId) -> Result<()> {
        self.intervals.remove(id.index, id.generation)?;
        Ok(())
    }

    /// Iterates live intervals in slot order.
    pub fn intervals(&self) -> impl Iterator<Item = (IntervalId, &Interval)> {
        self.intervals
            .iter()
            .map(|(index, generation, interval)| (IntervalId { index, generation }, interval))
    }

    /// Finds the geometric mirror of an interval: another live interval
    /// joining the same two joints in reversed direction. `None` is the
    /// normal outcome for boundary members.
    pub fn find_opposite_interval(&self, id: IntervalId) -> Result<Option<IntervalId>> {
        let subject = self.interval(id)?;
        let (alpha, omega) = (subject.alpha, subject.omega);
        Ok(self
            .intervals()
            .find(|(other_id, other)| {
                *other_id != id && other.alpha == omega && other.omega == alpha
            })
            .map(|(other_id, _)| other_id))
    }

    // --- faces ---

    /// Creates a triangle over three existing joints, in winding order.
    pub fn create_face(&mut self, j0: usize, j1: usize, j2: usize) -> Result<FaceId> {
        self.joint(j0)?;
        self.joint(j1)?;
        self.joint(j2)?;
        let (index, generation) = self.faces.insert(Face {
            joints: [j0, j1, j2],
        })?;
        Ok(FaceId { index, generation })
    }

    /// Live face count.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Looks up a face by id.
    pub fn face(&self, id: FaceId) -> Result<&Face> {
        self.faces.get(id.index, id.generation)
    }

    /// Removes a face.
    pub fn remove_face(&mut self, id: FaceId) -> Result<()> {
        self.faces.remove(id.index, id.generation)?;
        Ok(())
    }

    /// Iterates live faces in slot order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> {
        self.faces
            .iter()
            .map(|(index, generation, face)| (FaceId { index, generation }, face))
    }

    /// Midpoint of a face's three joint locations.
    pub fn face_midpoint(&self, id: FaceId) -> Result<[f32; 3]> {
        let [a, b, c] = self.face_locations(id)?;
        Ok([
            (a[0] + b[0] + c[0]) / 3.0,
            (a[1] + b[1] + c[1]) / 3.0,
            (a[2] + b[2] + c[2]) / 3.0,
        ])
    }

    /// Unit normal of the face plane; zero for a degenerate triangle.
    pub fn face_normal(&self, id: FaceId) -> Result<[f32; 3]> {
        let [a, b, c] = self.face_locations(id)?;
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let cross = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        let magnitude = (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt();
        if magnitude == 0.0 {
            return Ok([0.0; 3]);
        }
        Ok([
            cross[0] / magnitude,
            cross[1] / magnitude,
            cross[2] / magnitude,
        ])
    }

    /// Mean rest length of the face's side intervals. Sides without a
    /// connecting interval are skipped; a face with no sides spans zero.
    pub fn face_ideal_span(&self, id: FaceId) -> Result<f32> {
        let [j0, j1, j2] = self.face(id)?.joints;
        let mut sum = 0.0;
        let mut found = 0;
        for (a, b) in [(j0, j1), (j1, j2), (j2, j0)] {
            if let Some(length) = self.intervals().find_map(|(_, interval)| {
                let joins = (interval.alpha == a && interval.omega == b)
                    || (interval.alpha == b && interval.omega == a);
                joins.then_some(interval.rest_length)
            }) {
                sum += length;
                found += 1;
            }
        }
        if found == 0 {
            return Ok(0.0);
        }
        Ok(sum / found as f32)
    }

    /// Finds the face sharing this face's joint set with reversed winding.
    /// `None` is the normal outcome for boundary faces.
    pub fn find_opposite_face(&self, id: FaceId) -> Result<Option<FaceId>> {
        let [a, b, c] = self.face(id)?.joints;
        let reversed = [c, b, a];
        Ok(self
            .faces()
            .find(|(other_id, other)| *other_id != id && is_rotation(other.joints, reversed))
            .map(|(other_id, _)| other_id))
    }

    fn face_locations(&self, id: FaceId) -> Result<[[f32; 3]; 3]> {
        let [j0, j1, j2] = self.face(id)?.joints;
        Ok([
            self.joint(j0)?.location,
            self.joint(j1)?.location,
            self.joint(j2)?.location,
        ])
    }

    // --- age, gestation, locomotion ---

    /// Ticks lived since creation or the last reset.
    #[must_use]
    pub fn age(&self) -> u64 {
        self.age
    }

    /// Whether the gestation countdown is still running.
    #[must_use]
    pub fn is_gestating(&self) -> bool {
        self.gestation > 0
    }

    /// Starts or extends the gestation countdown.
    pub fn set_gestating(&mut self, countdown: u64) {
        self.gestation = countdown;
    }

    /// The state in effect for the most recently completed tick batch.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The requested state, committed at the next tick boundary.
    #[must_use]
    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    /// Requests a transition. Any state may request any other.
    pub fn set_next_direction(&mut self, direction: Direction) {
        self.next_direction = direction;
    }

    pub(crate) fn commit_direction(&mut self) {
        self.direction = self.next_direction;
    }

    /// Advances age and gestation by a completed tick batch. Returns true
    /// if this batch finished gestation.
    pub(crate) fn advance(&mut self, ticks: u64) -> bool {
        self.age += ticks;
        let was_gestating = self.is_gestating();
        self.gestation = self.gestation.saturating_sub(ticks);
        was_gestating && !self.is_gestating()
    }
}

fn is_rotation(candidate: [usize; 3], of: [usize; 3]) -> bool {
    (0..3).any(|shift| {
        (0..3).all(|position| candidate[position] == of[(position + shift) % 3])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenseg_data::IntervalRole;

    fn fabric_with_joints(count: usize) -> Fabric {
        let mut fabric = Fabric::new(16, 16, 8);
        for i in 0..count {
            fabric
                .create_joint(
                    JointTag::new(i as u64),
                    Laterality::Middle,
                    i as f32,
                    0.0,
                    0.0,
                )
                .unwrap();
        }
        fabric
    }

    #[test]
    fn test_joint_capacity_exhaustion() {
        let mut fabric = Fabric::new(1, 4, 4);
        fabric
            .create_joint(JointTag::new(0), Laterality::Middle, 0.0, 0.0, 0.0)
            .unwrap();
        assert_eq!(
            fabric.create_joint(JointTag::new(1), Laterality::LeftSide, 1.0, 0.0, 0.0),
            Err(KernelError::capacity("joint", 1))
        );
    }

    #[test]
    fn test_interval_requires_valid_joints() {
        let mut fabric = fabric_with_joints(2);
        assert_eq!(
            fabric.create_interval(0, 5, IntervalRole::Triangle, 1.0),
            Err(KernelError::invalid_index("joint", 5))
        );
    }

    #[test]
    fn test_removed_interval_id_is_stale_forever() {
        let mut fabric = fabric_with_joints(3);
        let id = fabric
            .create_interval(0, 1, IntervalRole::Triangle, 1.0)
            .unwrap();
        fabric.remove_interval(id).unwrap();
        assert_eq!(
            fabric.interval(id).unwrap_err(),
            KernelError::stale("interval", id.index())
        );
        // Slot reuse must not resurrect the old id.
        let reused = fabric
            .create_interval(1, 2, IntervalRole::Ring, 0.9)
            .unwrap();
        assert_eq!(reused.index(), id.index());
        assert!(fabric.interval(id).is_err());
        assert!(fabric.interval(reused).is_ok());
    }

    #[test]
    fn test_opposite_interval_found_and_absent() {
        let mut fabric = fabric_with_joints(3);
        let forward = fabric
            .create_interval(0, 1, IntervalRole::Triangle, 1.0)
            .unwrap();
        let lone = fabric
            .create_interval(1, 2, IntervalRole::Triangle, 1.0)
            .unwrap();
        assert_eq!(fabric.find_opposite_interval(forward).unwrap(), None);
        let backward = fabric
            .create_interval(1, 0, IntervalRole::Triangle, 1.0)
            .unwrap();
        assert_eq!(
            fabric.find_opposite_interval(forward).unwrap(),
            Some(backward)
        );
        assert_eq!(fabric.find_opposite_interval(lone).unwrap(), None);
    }

    #[test]
    fn test_opposite_face_reversed_winding() {
        let mut fabric = fabric_with_joints(3);
        let face = fabric.create_face(0, 1, 2).unwrap();
        assert_eq!(fabric.find_opposite_face(face).unwrap(), None);
        // Same winding is not a mirror.
        let same = fabric.create_face(1, 2, 0).unwrap();
        assert_eq!(fabric.find_opposite_face(face).unwrap(), None);
        fabric.remove_face(same).unwrap();
        let mirror = fabric.create_face(2, 1, 0).unwrap();
        assert_eq!(fabric.find_opposite_face(face).unwrap(), Some(mirror));
    }

    #[test]
    fn test_face_midpoint_and_normal() {
        let mut fabric = Fabric::new(8, 8, 4);
        for (x, y) in [(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)] {
            fabric
                .create_joint(JointTag::new(0), Laterality::Middle, x, y, 0.0)
                .unwrap();
        }
        let face = fabric.create_face(0, 1, 2).unwrap();
        let midpoint = fabric.face_midpoint(face).unwrap();
        assert!((midpoint[0] - 2.0 / 3.0).abs() < 1e-6);
        assert!((midpoint[1] - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(fabric.face_normal(face).unwrap(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_face_ideal_span_averages_sides() {
        let mut fabric = fabric_with_joints(3);
        fabric
            .create_interval(0, 1, IntervalRole::Triangle, 1.0)
            .unwrap();
        fabric
            .create_interval(1, 2, IntervalRole::Triangle, 2.0)
            .unwrap();
        let face = fabric.create_face(0, 1, 2).unwrap();
        // Side (2, 0) has no interval and is skipped.
        assert_eq!(fabric.face_ideal_span(face).unwrap(), 1.5);
    }

    #[test]
    fn test_gestation_marks_intervals_exempt() {
        let mut fabric = fabric_with_joints(3);
        fabric.set_gestating(10);
        let structural = fabric
            .create_interval(0, 1, IntervalRole::NexusPush, 1.6)
            .unwrap();
        fabric.advance(10);
        let muscle = fabric
            .create_interval(1, 2, IntervalRole::Triangle, 1.0)
            .unwrap();
        assert!(fabric.interval(structural).unwrap().behavior_exempt());
        assert!(!fabric.interval(muscle).unwrap().behavior_exempt());
    }

    #[test]
    fn test_advance_reports_gestation_completion() {
        let mut fabric = Fabric::new(4, 4, 4);
        fabric.set_gestating(5);
        assert!(!fabric.advance(3));
        assert!(fabric.advance(3));
        assert!(!fabric.advance(3));
        assert_eq!(fabric.age(), 9);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut fabric = fabric_with_joints(3);
        fabric
            .create_interval(0, 1, IntervalRole::Triangle, 1.0)
            .unwrap();
        fabric.create_face(0, 1, 2).unwrap();
        fabric.set_gestating(4);
        fabric.set_next_direction(Direction::Forward);
        fabric.commit_direction();
        fabric.reset();
        assert_eq!(fabric.joint_count(), 0);
        assert_eq!(fabric.interval_count(), 0);
        assert_eq!(fabric.face_count(), 0);
        assert_eq!(fabric.age(), 0);
        assert!(!fabric.is_gestating());
        assert_eq!(fabric.direction(), Direction::Rest);
    }
}
