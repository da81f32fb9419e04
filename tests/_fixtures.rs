#![allow(dead_code)]

use limbscan::KernelConfig;

/// Seed shared by every generated input so failures reproduce.
pub const SEED: u64 = 0x5eed_1234_abcd_0042;

/// Grains exercised by the equivalence tests, from degenerate to default.
pub const GRAINS: [usize; 5] = [1, 7, 64, 1024, 1 << 20];

/// Small linear congruential generator (Knuth MMIX constants).
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        // The low bits of an LCG are weak; mix the high half down.
        self.state ^ (self.state >> 29)
    }
}

pub fn random_limbs(len: usize, seed: u64) -> Vec<u64> {
    let mut rng = Lcg::new(seed);
    (0..len).map(|_| rng.next_u64()).collect()
}

/// Limbs biased towards all-ones so chunk carries and long fix-ups are common.
pub fn carry_heavy_limbs(len: usize, seed: u64) -> Vec<u64> {
    let mut rng = Lcg::new(seed);
    (0..len)
        .map(|_| match rng.next_u64() % 4 {
            0 => rng.next_u64(),
            _ => u64::MAX,
        })
        .collect()
}

/// Doubles covering every exponent class, both signs, and NaN payloads.
pub fn random_doubles(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    (0..len).map(|_| f64::from_bits(rng.next_u64())).collect()
}

pub fn config(grain: usize) -> KernelConfig {
    KernelConfig::new(grain)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
