use foundation::time::Time;

/// Frame metadata derived from host timestamps.
///
/// The engine does not own a clock. Each host callback (animation frame,
/// pointer event) hands in a `Time`, and the clock turns it into a `Frame`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Seconds since the previous frame (0 for the first).
    pub dt_s: f64,
    /// Host time at this frame.
    pub time: Time,
}

#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last: Option<Frame>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances to `now`. Timestamps going backwards clamp `dt_s` to 0.
    pub fn advance(&mut self, now: Time) -> Frame {
        let frame = match self.last {
            None => Frame {
                index: 0,
                dt_s: 0.0,
                time: now,
            },
            Some(prev) => Frame {
                index: prev.index + 1,
                dt_s: now.seconds_since(prev.time).max(0.0),
                time: now,
            },
        };
        self.last = Some(frame);
        frame
    }

    pub fn last(&self) -> Option<Frame> {
        self.last
    }

    /// Index that the next `advance` will produce.
    pub fn next_index(&self) -> u64 {
        self.last.map(|f| f.index + 1).unwrap_or(0)
    }
}
