//! Delays of the one-shot acquisition sequence

/// Bias settle and conversion delays, in milliseconds
///
/// The defaults cover the 60 Hz filter setting. With the 50 Hz filter a
/// single conversion takes up to 66 ms, so raise `conversion_ms` accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Wait after enabling `V_BIAS` before triggering a conversion
    pub bias_settle_ms: u32,
    /// Wait after triggering a one-shot conversion before reading the result
    pub conversion_ms: u32,
}

impl Timing {
    /// Default bias settle time
    pub const BIAS_SETTLE_MS: u32 = 10;
    /// Default one-shot conversion time
    pub const CONVERSION_MS: u32 = 65;

    /// Create timing from explicit delays
    #[must_use]
    pub const fn new(bias_settle_ms: u32, conversion_ms: u32) -> Self {
        Self {
            bias_settle_ms,
            conversion_ms,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(Self::BIAS_SETTLE_MS, Self::CONVERSION_MS)
    }
}
