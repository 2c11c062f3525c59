/// Host timestamp in seconds.
///
/// The engine never reads a wall clock; every time-dependent call receives a
/// `Time` from the host (e.g. an animation-frame timestamp).
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64);

impl Time {
    pub fn from_millis(ms: f64) -> Self {
        Time(ms / 1000.0)
    }

    pub fn seconds_since(self, earlier: Time) -> f64 {
        self.0 - earlier.0
    }

    pub fn add_seconds(self, seconds: f64) -> Self {
        Time(self.0 + seconds)
    }
}
