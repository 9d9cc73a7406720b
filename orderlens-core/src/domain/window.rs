use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Time span covered by one instrument's orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

impl TimeWindow {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { earliest: instant, latest: instant }
    }

    /// Widen to include `instant`.
    pub fn include(&mut self, instant: DateTime<Utc>) {
        self.earliest = self.earliest.min(instant);
        self.latest = self.latest.max(instant);
    }

    /// Widen both ends by `padding`, saturating at the representable range.
    pub fn padded(&self, padding: Duration) -> Self {
        Self {
            earliest: self
                .earliest
                .checked_sub_signed(padding)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            latest: self.latest.checked_add_signed(padding).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn span(&self) -> Duration {
        self.latest - self.earliest
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.earliest <= instant && instant <= self.latest
    }
}
