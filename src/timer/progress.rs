//! Segmented progress ring.
//!
//! The countdown is shown as a ring of [`SEGMENT_COUNT`] segments. The
//! number of filled segments is `floor(remaining / phase_length * N)`;
//! segments empty clockwise starting at [`START_SEGMENT`].

/// Number of segments in the ring.
pub const SEGMENT_COUNT: u32 = 60;

/// Index of the first segment to empty as time runs out.
pub const START_SEGMENT: u32 = 1;

/// Derived progress display for one moment of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressRing {
    filled: u32,
}

impl ProgressRing {
    /// Computes the ring for `remaining` out of `phase_length` seconds.
    pub fn new(remaining: u32, phase_length: u32) -> Self {
        if phase_length == 0 {
            return Self { filled: 0 };
        }
        let filled = u64::from(remaining.min(phase_length)) * u64::from(SEGMENT_COUNT)
            / u64::from(phase_length);
        Self {
            filled: filled as u32,
        }
    }

    /// Number of filled segments (0..=60).
    pub fn filled(&self) -> u32 {
        self.filled
    }

    /// Returns true if segment `index` is drawn filled.
    pub fn is_filled(&self, index: u32) -> bool {
        let clockwise_distance = (index % SEGMENT_COUNT + SEGMENT_COUNT - START_SEGMENT) % SEGMENT_COUNT;
        clockwise_distance >= SEGMENT_COUNT - self.filled
    }

    /// Iterates the segments in index order.
    pub fn segments(&self) -> impl Iterator<Item = bool> + '_ {
        (0..SEGMENT_COUNT).map(|index| self.is_filled(index))
    }

    /// Renders the ring as a linear bar, filled segments first.
    pub fn to_bar(&self, filled: char, empty: char) -> String {
        let filled_count = self.filled as usize;
        let empty_count = (SEGMENT_COUNT - self.filled) as usize;
        std::iter::repeat(filled)
            .take(filled_count)
            .chain(std::iter::repeat(empty).take(empty_count))
            .collect()
    }
}
