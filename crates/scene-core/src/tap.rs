/// How a control was activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    TouchEnd,
    Click,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TapState {
    #[default]
    Idle,
    TouchHandled,
}

/// Suppresses the synthetic click a browser fires after a touch.
///
/// `Idle --touch-end--> TouchHandled --mouse move--> Idle`. Clicks are accepted
/// only in `Idle`; touch-ends are always accepted.
#[derive(Clone, Copy, Debug, Default)]
pub struct TapFilter {
    state: TapState,
}

impl TapFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the activation should trigger its action.
    pub fn accept(&mut self, activation: Activation) -> bool {
        match activation {
            Activation::TouchEnd => {
                self.state = TapState::TouchHandled;
                true
            }
            Activation::Click => self.state == TapState::Idle,
        }
    }

    pub fn pointer_moved(&mut self) {
        self.state = TapState::Idle;
    }

    pub fn state(&self) -> TapState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_click_after_touch_is_dropped() {
        let mut f = TapFilter::new();
        assert!(f.accept(Activation::TouchEnd));
        assert_eq!(f.state(), TapState::TouchHandled);
        assert!(!f.accept(Activation::Click));
    }

    #[test]
    fn mouse_move_rearms_clicks() {
        let mut f = TapFilter::new();
        f.accept(Activation::TouchEnd);
        f.pointer_moved();
        assert_eq!(f.state(), TapState::Idle);
        assert!(f.accept(Activation::Click));
        assert!(f.accept(Activation::Click));
    }
}
