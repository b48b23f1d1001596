//! Loading screen lifecycle: `Loading -> Ready -> Revealed`, forward only.
//!
//! Activation in `Ready` latches the gate, moves it to `Revealed` and starts
//! the two-stage exit animation (button scale-down, then the screen slides
//! off with a tilt). Any later activation is a no-op.

use crate::constants::{
    REVEAL_EXIT_SEC, REVEAL_EXIT_TILT_X_DEG, REVEAL_EXIT_TILT_Y_DEG, REVEAL_EXIT_TRANSLATE_VH,
    REVEAL_SCALE_SEC, REVEAL_SCALE_TO,
};
use crate::tween::{Ease, Tween};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadingPhase {
    Loading,
    Ready,
    Revealed,
}

/// Styles for the loading surface at one instant of the reveal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealFrame {
    pub button_scale: f32,
    pub translate_y_vh: f32,
    pub tilt_x_deg: f32,
    pub tilt_y_deg: f32,
    /// The surface is fully off-screen and should leave the interactive layer.
    pub finished: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct RevealAnimation {
    scale: Tween,
    exit: Tween,
}

impl RevealAnimation {
    pub fn start(now_sec: f64) -> Self {
        let scale = Tween::new(1.0, REVEAL_SCALE_TO, now_sec, REVEAL_SCALE_SEC, Ease::BackIn);
        let exit = Tween::new(0.0, 1.0, scale.end_sec(), REVEAL_EXIT_SEC, Ease::Power4InOut);
        Self { scale, exit }
    }

    pub fn sample(&self, now_sec: f64) -> RevealFrame {
        let k = self.exit.sample(now_sec);
        RevealFrame {
            button_scale: self.scale.sample(now_sec),
            translate_y_vh: REVEAL_EXIT_TRANSLATE_VH * k,
            tilt_x_deg: REVEAL_EXIT_TILT_X_DEG * k,
            tilt_y_deg: REVEAL_EXIT_TILT_Y_DEG * k,
            finished: self.exit.is_finished(now_sec),
        }
    }
}

#[derive(Debug)]
pub struct LoadingGate {
    phase: LoadingPhase,
    latched: bool,
    reveal: Option<RevealAnimation>,
    surface_removed: bool,
}

impl Default for LoadingGate {
    fn default() -> Self {
        Self {
            phase: LoadingPhase::Loading,
            latched: false,
            reveal: None,
            surface_removed: false,
        }
    }
}

impl LoadingGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> LoadingPhase {
        self.phase
    }

    /// `Loading -> Ready`. Returns true only on the transition itself.
    pub fn mark_ready(&mut self) -> bool {
        if self.phase != LoadingPhase::Loading {
            return false;
        }
        self.phase = LoadingPhase::Ready;
        true
    }

    /// `Ready -> Revealed`. Returns true when the reveal animation starts.
    pub fn activate(&mut self, now_sec: f64) -> bool {
        if self.phase != LoadingPhase::Ready || self.latched {
            return false;
        }
        self.latched = true;
        self.phase = LoadingPhase::Revealed;
        self.reveal = Some(RevealAnimation::start(now_sec));
        log::info!("[gate] reveal started");
        true
    }

    pub fn surface_removed(&self) -> bool {
        self.surface_removed
    }

    /// Frame of the running reveal, if any. The frame with `finished` set is
    /// returned exactly once.
    pub fn tick(&mut self, now_sec: f64) -> Option<RevealFrame> {
        let frame = self.reveal?.sample(now_sec);
        if frame.finished {
            self.reveal = None;
            self.surface_removed = true;
            log::info!("[gate] loading screen removed");
        }
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_only_move_forward() {
        let mut g = LoadingGate::new();
        assert!(!g.activate(0.0), "cannot reveal while loading");
        assert_eq!(g.phase(), LoadingPhase::Loading);
        assert!(g.mark_ready());
        assert!(!g.mark_ready());
        assert!(g.activate(0.0));
        assert_eq!(g.phase(), LoadingPhase::Revealed);
        assert!(!g.mark_ready());
        assert_eq!(g.phase(), LoadingPhase::Revealed);
    }

    #[test]
    fn double_activation_plays_once() {
        let mut g = LoadingGate::new();
        g.mark_ready();
        assert!(g.activate(1.0));
        assert!(!g.activate(1.0));
        assert!(!g.activate(1.1));

        let mut finished = 0;
        let mut t = 1.0;
        while t < 4.0 {
            if let Some(f) = g.tick(t) {
                finished += f.finished as u32;
            }
            t += 1.0 / 60.0;
        }
        assert_eq!(finished, 1);
        assert!(g.surface_removed());
        assert!(!g.activate(5.0));
        assert!(g.tick(5.0).is_none());
    }

    #[test]
    fn stages_run_in_order() {
        let anim = RevealAnimation::start(0.0);
        let mid_scale = anim.sample(REVEAL_SCALE_SEC as f64 * 0.5);
        assert_eq!(mid_scale.translate_y_vh, 0.0, "screen waits for the button");
        let after_scale = anim.sample(REVEAL_SCALE_SEC as f64);
        assert!((after_scale.button_scale - REVEAL_SCALE_TO).abs() < 1e-6);
        let end = anim.sample((REVEAL_SCALE_SEC + REVEAL_EXIT_SEC) as f64 + 0.01);
        assert!(end.finished);
        assert!((end.translate_y_vh - REVEAL_EXIT_TRANSLATE_VH).abs() < 1e-4);
        assert!((end.tilt_x_deg - REVEAL_EXIT_TILT_X_DEG).abs() < 1e-4);
    }
}
