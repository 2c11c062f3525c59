use foundation::math::ScreenPoint;
use foundation::time::Time;
use runtime::tween::{Ease, Tween, TweenSample};

use crate::config::ViewportConfig;
use crate::interpolate::SmoothZoom;
use crate::transform::Transform;

pub type PointerId = u32;

/// Coarse gesture state, as observed from outside.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Panning,
    Zooming,
    AnimatingFocus,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum WheelMode {
    #[default]
    Pixel,
    Line,
    Page,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WheelInput {
    pub point: ScreenPoint,
    pub delta_y: f64,
    pub mode: WheelMode,
    pub ctrl: bool,
}

/// How a pointer release resolved.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Release {
    /// The press never travelled past the click distance. Carries the release point.
    Click(ScreenPoint),
    /// The gesture moved the map (or is still a pinch with another pointer down).
    Gesture,
    /// No gesture was tracking this pointer.
    Ignored,
}

#[derive(Debug, Copy, Clone)]
struct Touch {
    id: PointerId,
    screen: ScreenPoint,
    /// Drawing-space point held under this pointer.
    anchor: ScreenPoint,
}

#[derive(Debug, Clone)]
enum Gesture {
    Idle,
    Pan {
        pointer: PointerId,
        origin: ScreenPoint,
        last: ScreenPoint,
        start: Transform,
        moved: bool,
    },
    Pinch {
        a: Touch,
        b: Touch,
    },
    Wheel {
        last: Time,
    },
    Focus(Tween<SmoothZoom>),
}

/// Owns the viewport transform and the gesture state machine.
///
/// A new gesture or focus command always replaces the current one; an
/// in-flight focus animation is sampled at the interruption time and its
/// frame becomes the starting point.
#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    transform: Transform,
    gesture: Gesture,
    width: f64,
    height: f64,
}

impl ViewportController {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            transform: Transform::IDENTITY,
            gesture: Gesture::Idle,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn state(&self) -> GestureState {
        match self.gesture {
            Gesture::Idle => GestureState::Idle,
            Gesture::Pan { .. } => GestureState::Panning,
            Gesture::Pinch { .. } | Gesture::Wheel { .. } => GestureState::Zooming,
            Gesture::Focus(_) => GestureState::AnimatingFocus,
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Container size changes keep the transform as is.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width * 0.5, self.height * 0.5)
    }

    /// Replaces the transform (clamped) and ends any gesture.
    pub fn set_transform(&mut self, transform: Transform) {
        self.gesture = Gesture::Idle;
        self.transform = self.clamped(transform, self.center());
    }

    fn clamped(&self, t: Transform, anchor: ScreenPoint) -> Transform {
        t.clamp_scale(self.config.min_scale, self.config.max_scale, anchor)
    }

    /// Stops an animation at its frame for `now`.
    fn interrupt(&mut self, now: Time) {
        if let Gesture::Focus(tween) = &self.gesture {
            let t = tween.sample(now).value();
            if t.is_finite() {
                self.transform = self.clamped(t, self.center());
            }
            tracing::trace!(transform = %self.transform, "focus animation interrupted");
        }
        self.gesture = Gesture::Idle;
    }

    pub fn pointer_down(&mut self, pointer: PointerId, p: ScreenPoint, now: Time) {
        match self.gesture.clone() {
            Gesture::Pan {
                pointer: first,
                last,
                ..
            } if first != pointer => {
                self.gesture = Gesture::Pinch {
                    a: Touch {
                        id: first,
                        screen: last,
                        anchor: self.transform.invert(last),
                    },
                    b: Touch {
                        id: pointer,
                        screen: p,
                        anchor: self.transform.invert(p),
                    },
                };
            }
            Gesture::Pinch { .. } => {}
            _ => {
                self.interrupt(now);
                self.gesture = Gesture::Pan {
                    pointer,
                    origin: p,
                    last: p,
                    start: self.transform,
                    moved: false,
                };
            }
        }
    }

    /// Returns `true` if the transform changed.
    pub fn pointer_move(&mut self, pointer: PointerId, p: ScreenPoint) -> bool {
        let click_distance = self.config.click_distance_px;
        match &mut self.gesture {
            Gesture::Pan {
                pointer: id,
                origin,
                last,
                start,
                moved,
            } if *id == pointer => {
                *last = p;
                if !*moved && p.distance(*origin) <= click_distance {
                    return false;
                }
                *moved = true;
                let next = start.translated(p.x - origin.x, p.y - origin.y);
                let changed = next != self.transform;
                self.transform = next;
                changed
            }
            Gesture::Pinch { a, b } => {
                if a.id == pointer {
                    a.screen = p;
                } else if b.id == pointer {
                    b.screen = p;
                } else {
                    return false;
                }
                let (a, b) = (*a, *b);
                let dl = a.anchor.distance(b.anchor);
                if dl <= 0.0 || !dl.is_finite() {
                    return false;
                }
                let k = self.config.clamp_scale(a.screen.distance(b.screen) / dl);
                let next = Transform::anchored(
                    k,
                    a.screen.midpoint(b.screen),
                    a.anchor.midpoint(b.anchor),
                );
                if !next.is_finite() {
                    return false;
                }
                let changed = next != self.transform;
                self.transform = next;
                changed
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self, pointer: PointerId, p: ScreenPoint) -> Release {
        match self.gesture.clone() {
            Gesture::Pan {
                pointer: id,
                origin,
                moved,
                ..
            } if id == pointer => {
                self.gesture = Gesture::Idle;
                if !moved && p.distance(origin) <= self.config.click_distance_px {
                    Release::Click(p)
                } else {
                    Release::Gesture
                }
            }
            Gesture::Pinch { a, b } if a.id == pointer || b.id == pointer => {
                let rest = if a.id == pointer { b } else { a };
                // The remaining pointer keeps panning from where it is.
                self.gesture = Gesture::Pan {
                    pointer: rest.id,
                    origin: rest.screen,
                    last: rest.screen,
                    start: self.transform,
                    moved: true,
                };
                Release::Gesture
            }
            _ => Release::Ignored,
        }
    }

    /// Pointer lost (capture lost, touch cancelled): ends the gesture without a click.
    pub fn pointer_cancel(&mut self, pointer: PointerId) {
        let tracked = match &self.gesture {
            Gesture::Pan { pointer: id, .. } => *id == pointer,
            Gesture::Pinch { a, b } => a.id == pointer || b.id == pointer,
            _ => false,
        };
        if tracked {
            self.gesture = Gesture::Idle;
        }
    }

    /// Zooms by `2^(-delta_y * mode factor)` about the wheel point. Returns `true` if the transform changed.
    pub fn wheel(&mut self, input: WheelInput, now: Time) -> bool {
        if !input.delta_y.is_finite() || !input.point.is_finite() {
            return false;
        }
        if matches!(self.gesture, Gesture::Pan { .. } | Gesture::Pinch { .. }) {
            return false;
        }
        self.interrupt(now);
        let factor = match input.mode {
            WheelMode::Pixel => self.config.wheel_pixel_factor,
            WheelMode::Line => self.config.wheel_line_factor,
            WheelMode::Page => self.config.wheel_page_factor,
        };
        let ctrl = if input.ctrl {
            self.config.wheel_ctrl_multiplier
        } else {
            1.0
        };
        let k = self
            .config
            .clamp_scale(self.transform.scale * 2f64.powf(-input.delta_y * factor * ctrl));
        self.gesture = Gesture::Wheel { last: now };
        if k == self.transform.scale {
            return false;
        }
        self.transform = self.transform.scaled_at(k, input.point);
        true
    }

    /// Starts a focus animation that centres drawing point `target` at the
    /// focus scale. `None` is a no-op.
    pub fn focus_on(&mut self, target: Option<ScreenPoint>, now: Time) -> bool {
        let Some(target) = target.filter(|p| p.is_finite()) else {
            return false;
        };
        self.interrupt(now);
        let k = self.config.clamp_scale(self.config.focus_scale);
        let end = Transform::anchored(k, self.center(), target);
        let interp = SmoothZoom::new(self.transform, end, (self.width, self.height));
        tracing::debug!(from = %self.transform, to = %end, "focus animation started");
        self.gesture = Gesture::Focus(Tween::new(
            interp,
            now,
            self.config.focus_duration_s,
            Ease::CubicInOut,
        ));
        true
    }

    /// Advances the focus animation and the wheel idle timeout.
    /// Returns `true` if the transform changed.
    pub fn tick(&mut self, now: Time) -> bool {
        match &self.gesture {
            Gesture::Focus(tween) => {
                let sample = tween.sample(now);
                let finished = sample.is_finished();
                let next = match sample {
                    TweenSample::Finished(t) => t,
                    TweenSample::Running(t) => self.clamped(t, self.center()),
                };
                if finished {
                    self.gesture = Gesture::Idle;
                }
                if !next.is_finite() {
                    return false;
                }
                let changed = next != self.transform;
                self.transform = next;
                changed
            }
            Gesture::Wheel { last } => {
                if now.seconds_since(*last) >= self.config.wheel_idle_s {
                    self.gesture = Gesture::Idle;
                }
                false
            }
            _ => false,
        }
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}
