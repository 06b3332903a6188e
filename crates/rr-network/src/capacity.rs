//! Edge capacity policy.

use rr_core::SimRng;

/// How many vehicles a newly created edge may carry at once.
///
/// The capacity is fixed at edge creation; only the load changes afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CapacityPolicy {
    /// Every edge gets the same capacity.
    Fixed(u32),
    /// Uniform in `low..high` (half-open).  Collapses to `low` when
    /// `high <= low`.
    Uniform { low: u32, high: u32 },
}

impl CapacityPolicy {
    pub fn sample(&self, rng: &mut SimRng) -> u32 {
        match *self {
            CapacityPolicy::Fixed(n) => n,
            CapacityPolicy::Uniform { low, high } if high <= low => low,
            CapacityPolicy::Uniform { low, high } => rng.gen_range(low..high),
        }
    }
}

impl Default for CapacityPolicy {
    /// 25–99 vehicles per road segment.
    fn default() -> Self {
        CapacityPolicy::Uniform { low: 25, high: 100 }
    }
}
