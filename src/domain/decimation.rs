// Decimation policy - maps a window duration to a sampling stride
use crate::domain::errors::PolicyError;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;

/// Windows at least `min_duration_ms` long keep every `stride`-th point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub min_duration_ms: i64,
    pub stride: usize,
}

impl Tier {
    pub const fn new(min_duration_ms: i64, stride: usize) -> Self {
        Self {
            min_duration_ms,
            stride,
        }
    }
}

/// Validated tier table, ordered from the longest threshold to the shortest.
/// Windows shorter than every threshold are not decimated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimationPolicy {
    tiers: Vec<Tier>,
}

impl DecimationPolicy {
    pub fn new(tiers: impl IntoIterator<Item = Tier>) -> Result<Self, PolicyError> {
        let mut tiers: Vec<Tier> = tiers.into_iter().collect();
        if tiers.is_empty() {
            return Err(PolicyError::NoTiers);
        }

        for tier in &tiers {
            if tier.stride == 0 {
                return Err(PolicyError::ZeroStride {
                    min_duration_ms: tier.min_duration_ms,
                });
            }
            if tier.min_duration_ms < 0 {
                return Err(PolicyError::NegativeThreshold {
                    min_duration_ms: tier.min_duration_ms,
                });
            }
        }

        tiers.sort_by(|a, b| b.min_duration_ms.cmp(&a.min_duration_ms));

        // Narrower windows must never be sampled more coarsely than wider ones
        for pair in tiers.windows(2) {
            let (longer, shorter) = (pair[0], pair[1]);
            if longer.min_duration_ms == shorter.min_duration_ms {
                return Err(PolicyError::DuplicateThreshold {
                    min_duration_ms: longer.min_duration_ms,
                });
            }
            if shorter.stride > longer.stride {
                return Err(PolicyError::NonMonotonic {
                    shorter_ms: shorter.min_duration_ms,
                    shorter_stride: shorter.stride,
                    longer_ms: longer.min_duration_ms,
                    longer_stride: longer.stride,
                });
            }
        }

        Ok(Self { tiers })
    }

    /// Stride for a window of the given duration (always >= 1)
    pub fn stride_for(&self, duration_ms: i64) -> usize {
        self.tiers
            .iter()
            .find(|tier| duration_ms >= tier.min_duration_ms)
            .map(|tier| tier.stride)
            .unwrap_or(1)
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }
}

impl Default for DecimationPolicy {
    fn default() -> Self {
        Self {
            tiers: vec![
                Tier::new(7 * MINUTE_MS, 500),
                Tier::new(5 * MINUTE_MS, 250),
                Tier::new(3 * MINUTE_MS, 100),
                Tier::new(MINUTE_MS, 50),
                Tier::new(30 * SECOND_MS, 10),
            ],
        }
    }
}
