/// Easing curves used by overlay fades and the loading-screen reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    Linear,
    QuadOut,
    /// Quintic in-out ("power4" in tweening-library naming).
    Power4InOut,
    /// Slight wind-up before accelerating.
    BackIn,
}

const BACK_OVERSHOOT: f32 = 1.70158;

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power4InOut => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            Ease::BackIn => (BACK_OVERSHOOT + 1.0) * t * t * t - BACK_OVERSHOOT * t * t,
        }
    }
}

/// A scalar tween anchored at an absolute start time (seconds).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start_sec: f64,
    pub duration_sec: f32,
    pub ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, start_sec: f64, duration_sec: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            start_sec,
            duration_sec,
            ease,
        }
    }

    /// Linear progress in [0, 1]; 0 before the start.
    pub fn progress(&self, now_sec: f64) -> f32 {
        if self.duration_sec <= 0.0 {
            return 1.0;
        }
        (((now_sec - self.start_sec) / self.duration_sec as f64).clamp(0.0, 1.0)) as f32
    }

    pub fn sample(&self, now_sec: f64) -> f32 {
        let p = self.progress(now_sec);
        if p >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.ease.apply(p)
    }

    pub fn is_finished(&self, now_sec: f64) -> bool {
        self.progress(now_sec) >= 1.0
    }

    pub fn end_sec(&self) -> f64 {
        self.start_sec + self.duration_sec as f64
    }
}
