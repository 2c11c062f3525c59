use foundation::time::Time;

/// Maps normalized progress `t ∈ [0, 1]` to a value.
pub trait Interpolator {
    type Value;

    fn at(&self, t: f64) -> Self::Value;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    #[default]
    CubicInOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TweenSample<V> {
    Running(V),
    Finished(V),
}

impl<V> TweenSample<V> {
    pub fn value(self) -> V {
        match self {
            TweenSample::Running(v) | TweenSample::Finished(v) => v,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TweenSample::Finished(_))
    }
}

/// Time-driven animation over an interpolator. Cancel by dropping it.
#[derive(Debug, Clone)]
pub struct Tween<I> {
    interpolator: I,
    start: Time,
    duration_s: f64,
    ease: Ease,
}

impl<I: Interpolator> Tween<I> {
    pub fn new(interpolator: I, start: Time, duration_s: f64, ease: Ease) -> Self {
        Self {
            interpolator,
            start,
            duration_s,
            ease,
        }
    }

    pub fn start(&self) -> Time {
        self.start
    }

    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    /// Linear progress in `[0, 1]`; zero-length tweens are complete immediately.
    pub fn progress(&self, now: Time) -> f64 {
        if !(self.duration_s > 0.0) {
            return 1.0;
        }
        (now.seconds_since(self.start) / self.duration_s).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: Time) -> TweenSample<I::Value> {
        let p = self.progress(now);
        if p >= 1.0 {
            TweenSample::Finished(self.interpolator.at(1.0))
        } else {
            TweenSample::Running(self.interpolator.at(self.ease.apply(p)))
        }
    }

    /// The end value, regardless of time.
    pub fn finish(&self) -> I::Value {
        self.interpolator.at(1.0)
    }
}
