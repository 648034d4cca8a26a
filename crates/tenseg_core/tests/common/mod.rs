use tenseg_core::config::KernelConfig;
use tenseg_core::engine::PhysicsEngine;
use tenseg_core::layout::InstanceLayout;
use tenseg_core::store::FabricStore;
use tenseg_data::{GlobalFeature, IntervalRole, Laterality};

/// Deterministic stand-in for the external numeric engine.
///
/// Allocates the shared buffer exactly as the layout derivation demands
/// (or deliberately skewed, for contract tests) and fills an instance's
/// regions with a recognizable ramp on every iterate call.
#[allow(dead_code)]
pub struct StubEngine {
    buffer: Vec<f32>,
    layout: Option<InstanceLayout>,
    instances: usize,
    skew_bytes: usize,
    pub still_gestating: bool,
    pub centralize_calls: usize,
    pub altitude: Option<f32>,
    pub features: Vec<(GlobalFeature, f32)>,
}

#[allow(dead_code)]
impl StubEngine {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            layout: None,
            instances: 0,
            skew_bytes: 0,
            still_gestating: false,
            centralize_calls: 0,
            altitude: None,
            features: Vec::new(),
        }
    }

    /// An engine that reports a byte total off by `skew` bytes.
    pub fn skewed(skew: usize) -> Self {
        let mut engine = Self::new();
        engine.skew_bytes = skew;
        engine
    }
}

impl PhysicsEngine for StubEngine {
    fn init(
        &mut self,
        _max_joints: usize,
        max_intervals: usize,
        max_faces: usize,
        max_instances: usize,
    ) -> usize {
        let layout = InstanceLayout::new(max_intervals, max_faces);
        self.buffer = vec![0.0; layout.total_floats() * max_instances];
        self.layout = Some(layout);
        self.instances = max_instances;
        layout.total_bytes() * max_instances + self.skew_bytes
    }

    fn iterate(&mut self, instance: usize, _ticks: u64) -> bool {
        if let Some(layout) = self.layout {
            let start = instance * layout.total_floats();
            let end = start + layout.total_floats();
            for (offset, slot) in self.buffer[start..end].iter_mut().enumerate() {
                *slot = offset as f32;
            }
        }
        self.still_gestating
    }

    fn centralize(&mut self, _instance: usize) {
        self.centralize_calls += 1;
    }

    fn set_altitude(&mut self, _instance: usize, altitude: f32) {
        self.altitude = Some(altitude);
    }

    fn set_feature(&mut self, feature: GlobalFeature, value: f32) -> f32 {
        self.features.push((feature, value));
        value
    }

    fn geometry(&self) -> &[f32] {
        &self.buffer
    }
}

/// Builder for a store with instance 0 pre-populated.
#[allow(dead_code)]
pub struct StoreBuilder {
    config: KernelConfig,
    joints: Vec<(Laterality, f32, f32, f32)>,
    intervals: Vec<(usize, usize, IntervalRole)>,
    gestation: u64,
}

#[allow(dead_code)]
impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            config: KernelConfig::default(),
            joints: Vec::new(),
            intervals: Vec::new(),
            gestation: 0,
        }
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut KernelConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_joint(mut self, laterality: Laterality, x: f32, y: f32, z: f32) -> Self {
        self.joints.push((laterality, x, y, z));
        self
    }

    /// A row of `count` middle joints along the x axis.
    pub fn with_joint_row(mut self, count: usize) -> Self {
        for i in 0..count {
            self.joints
                .push((Laterality::Middle, i as f32, 0.0, 0.0));
        }
        self
    }

    pub fn with_interval(mut self, alpha: usize, omega: usize, role: IntervalRole) -> Self {
        self.intervals.push((alpha, omega, role));
        self
    }

    /// A chain of triangle pulls along a joint row.
    pub fn with_interval_chain(mut self, count: usize) -> Self {
        for i in 0..count {
            self.intervals.push((i, i + 1, IntervalRole::Triangle));
        }
        self
    }

    pub fn with_gestation(mut self, countdown: u64) -> Self {
        self.gestation = countdown;
        self
    }

    pub fn build(self) -> FabricStore {
        let mut store = FabricStore::new(self.config).expect("valid test config");
        if self.gestation > 0 {
            store
                .instance_mut(0)
                .expect("instance 0")
                .set_gestating(self.gestation);
        }
        for (laterality, x, y, z) in self.joints {
            store
                .create_joint(0, laterality, x, y, z)
                .expect("joint within capacity");
        }
        for (alpha, omega, role) in self.intervals {
            store
                .create_interval(0, alpha, omega, role)
                .expect("interval within capacity");
        }
        store
    }
}
