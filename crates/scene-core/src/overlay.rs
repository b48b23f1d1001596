//! Modal overlay fades.
//!
//! Each modal carries a target visibility, a display flag, an opacity and at
//! most one in-flight fade. A new `show`/`hide` replaces the running fade and
//! starts from the current opacity, so the last call wins and nothing jumps.

use crate::constants::FADE_DURATION_SEC;
use crate::error::SceneError;
use crate::tween::{Ease, Tween};
use fnv::FnvHashMap;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FadeKind {
    In,
    Out,
}

#[derive(Clone, Debug)]
pub struct Overlay {
    visibility: Visibility,
    displayed: bool,
    opacity: f32,
    fade: Option<(FadeKind, Tween)>,
    duration_sec: f32,
}

impl Overlay {
    pub fn hidden(duration_sec: f32) -> Self {
        Self {
            visibility: Visibility::Hidden,
            displayed: false,
            opacity: 0.0,
            fade: None,
            duration_sec,
        }
    }

    /// Displayed immediately at the current opacity, then fades to 1.
    pub fn show(&mut self, now_sec: f64) {
        self.visibility = Visibility::Visible;
        self.displayed = true;
        let tw = Tween::new(self.opacity, 1.0, now_sec, self.duration_sec, Ease::QuadOut);
        self.fade = Some((FadeKind::In, tw));
    }

    /// Fades to 0; display is switched off only when the fade completes.
    pub fn hide(&mut self, now_sec: f64) {
        self.visibility = Visibility::Hidden;
        let tw = Tween::new(self.opacity, 0.0, now_sec, self.duration_sec, Ease::QuadOut);
        self.fade = Some((FadeKind::Out, tw));
    }

    /// Advance the running fade. Returns true while anything changed this tick.
    pub fn tick(&mut self, now_sec: f64) -> bool {
        let Some((kind, tw)) = self.fade else {
            return false;
        };
        self.opacity = tw.sample(now_sec);
        if tw.is_finished(now_sec) {
            self.fade = None;
            if kind == FadeKind::Out {
                self.displayed = false;
            }
        }
        true
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_transitioning(&self) -> bool {
        self.fade.is_some()
    }
}

/// Style to push to the DOM for one modal after a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayUpdate {
    pub modal: String,
    pub displayed: bool,
    pub opacity: f32,
}

pub type OverlayUpdates = SmallVec<[OverlayUpdate; 2]>;

#[derive(Debug)]
pub struct OverlayController {
    modals: FnvHashMap<String, Overlay>,
    duration_sec: f32,
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayController {
    pub fn new() -> Self {
        Self::with_duration(FADE_DURATION_SEC)
    }

    pub fn with_duration(duration_sec: f32) -> Self {
        Self {
            modals: FnvHashMap::default(),
            duration_sec,
        }
    }

    pub fn register(&mut self, name: impl Into<String>) {
        let d = self.duration_sec;
        self.modals
            .entry(name.into())
            .or_insert_with(|| Overlay::hidden(d));
    }

    pub fn show(&mut self, name: &str, now_sec: f64) -> Result<(), SceneError> {
        self.modal_mut(name)?.show(now_sec);
        log::info!("[overlay] show {}", name);
        Ok(())
    }

    pub fn hide(&mut self, name: &str, now_sec: f64) -> Result<(), SceneError> {
        self.modal_mut(name)?.hide(now_sec);
        log::info!("[overlay] hide {}", name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Overlay> {
        self.modals.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modals.keys().map(String::as_str)
    }

    /// Advance every running fade and report the ones that changed.
    pub fn tick(&mut self, now_sec: f64) -> OverlayUpdates {
        let mut out = OverlayUpdates::new();
        for (name, overlay) in self.modals.iter_mut() {
            if overlay.tick(now_sec) {
                out.push(OverlayUpdate {
                    modal: name.clone(),
                    displayed: overlay.is_displayed(),
                    opacity: overlay.opacity(),
                });
            }
        }
        out
    }

    fn modal_mut(&mut self, name: &str) -> Result<&mut Overlay, SceneError> {
        self.modals
            .get_mut(name)
            .ok_or_else(|| SceneError::UnknownModal(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_displays_immediately_at_zero_opacity() {
        let mut o = Overlay::hidden(0.5);
        o.show(1.0);
        assert!(o.is_displayed());
        assert_eq!(o.opacity(), 0.0);
        o.tick(1.0);
        assert_eq!(o.opacity(), 0.0);
        o.tick(1.25);
        assert!(o.opacity() > 0.0 && o.opacity() < 1.0);
        o.tick(1.5);
        assert_eq!(o.opacity(), 1.0);
        assert!(!o.is_transitioning());
    }

    #[test]
    fn hide_keeps_display_until_fade_completes() {
        let mut o = Overlay::hidden(0.5);
        o.show(0.0);
        o.tick(0.5);
        o.hide(1.0);
        o.tick(1.4);
        assert!(o.is_displayed());
        assert!(o.opacity() > 0.0);
        o.tick(1.5);
        assert!(!o.is_displayed());
        assert_eq!(o.opacity(), 0.0);
    }

    #[test]
    fn hide_supersedes_show_without_flicker() {
        let mut o = Overlay::hidden(0.5);
        o.show(0.0);
        o.hide(0.0);
        let mut t = 0.0;
        while t <= 1.0 {
            o.tick(t);
            assert_eq!(o.opacity(), 0.0, "opacity rose at t={t}");
            t += 1.0 / 60.0;
        }
        assert_eq!(o.visibility(), Visibility::Hidden);
        assert!(!o.is_displayed());
    }

    #[test]
    fn hide_mid_show_fades_down_from_current_opacity() {
        let mut o = Overlay::hidden(0.5);
        o.show(0.0);
        o.tick(0.2);
        let peak = o.opacity();
        o.hide(0.2);
        let mut t = 0.2;
        while t <= 0.8 {
            o.tick(t);
            assert!(o.opacity() <= peak + 1e-6);
            t += 1.0 / 60.0;
        }
        assert!(!o.is_displayed());
    }

    #[test]
    fn unknown_modal_is_an_error() {
        let mut c = OverlayController::new();
        c.register("about");
        assert!(c.show("about", 0.0).is_ok());
        assert_eq!(
            c.hide("contact", 0.0),
            Err(SceneError::UnknownModal("contact".into()))
        );
    }

    #[test]
    fn tick_reports_only_changing_modals() {
        let mut c = OverlayController::new();
        c.register("about");
        c.register("work");
        assert!(c.tick(0.0).is_empty());
        c.show("work", 0.0).unwrap();
        let updates = c.tick(0.1);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].modal, "work");
        assert!(updates[0].displayed);
    }
}
