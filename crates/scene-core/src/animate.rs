use crate::scene::{NodeId, SceneGraph};
use glam::{Quat, Vec3};

#[derive(Clone, Debug)]
struct IdleEntry {
    node: NodeId,
    base: Quat,
    angle: f64,
}

/// Continuous spin about the local Y axis for decorative nodes, advanced by
/// a fixed step every frame regardless of input.
#[derive(Clone, Debug, Default)]
pub struct IdleAnimators {
    entries: Vec<IdleEntry>,
}

impl IdleAnimators {
    pub fn new(scene: &SceneGraph, nodes: &[NodeId]) -> Self {
        let entries = nodes
            .iter()
            .filter_map(|&node| {
                scene.node(node).map(|n| IdleEntry {
                    node,
                    base: n.local.rotation,
                    angle: 0.0,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn advance(&mut self, scene: &mut SceneGraph, step_radians: f32) {
        for e in &mut self.entries {
            e.angle += step_radians as f64;
            if let Some(node) = scene.node_mut(e.node) {
                node.local.rotation = e.base * Quat::from_rotation_y(e.angle as f32);
            }
        }
    }

    /// Accumulated (unwrapped) spin of a node.
    pub fn angle(&self, node: NodeId) -> Option<f64> {
        self.entries.iter().find(|e| e.node == node).map(|e| e.angle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Breathing opacity driven by wall-clock time, so its speed does not depend
/// on the frame rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreathingPulse {
    pub period_sec: f32,
    pub min_opacity: f32,
    pub max_opacity: f32,
}

impl BreathingPulse {
    pub fn opacity_at(&self, elapsed_sec: f64) -> f32 {
        let period = self.period_sec.max(1e-3) as f64;
        let phase = (elapsed_sec / period) * std::f64::consts::TAU;
        let wave = (0.5 + 0.5 * phase.sin()) as f32;
        self.min_opacity + (self.max_opacity - self.min_opacity) * wave
    }
}

/// The pulsing "click here" sprite. Hidden for good once the user opens a
/// modal from the scene.
#[derive(Clone, Debug)]
pub struct Indicator {
    pub position: Vec3,
    pub size: f32,
    pulse: BreathingPulse,
    visible: bool,
    opacity: f32,
}

impl Indicator {
    pub fn new(position: Vec3, size: f32, pulse: BreathingPulse) -> Self {
        Self {
            position,
            size,
            pulse,
            visible: true,
            opacity: pulse.max_opacity,
        }
    }

    pub fn advance(&mut self, now_sec: f64) {
        if self.visible {
            self.opacity = self.pulse.opacity_at(now_sec);
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.opacity = 0.0;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Transform;

    #[test]
    fn spin_accumulates_every_frame() {
        let mut g = SceneGraph::new();
        let a = g.add_node("Minecraft_Block_A", None, Transform::default(), None);
        let mut idle = IdleAnimators::new(&g, &[a]);
        let mut last = idle.angle(a).unwrap();
        for _ in 0..1000 {
            idle.advance(&mut g, 0.01);
            let now = idle.angle(a).unwrap();
            assert!(now > last);
            last = now;
        }
        assert!((last - 10.0).abs() < 1e-6);
    }

    #[test]
    fn pulse_is_time_based_and_bounded() {
        let p = BreathingPulse {
            period_sec: 2.0,
            min_opacity: 0.35,
            max_opacity: 1.0,
        };
        // same wall-clock instant, same opacity, however many frames led there
        assert!((p.opacity_at(0.5) - p.opacity_at(2.5)).abs() < 1e-6);
        assert!((p.opacity_at(0.5) - 1.0).abs() < 1e-6);
        assert!((p.opacity_at(1.5) - 0.35).abs() < 1e-6);
        let mut t = 0.0;
        while t < 4.0 {
            let o = p.opacity_at(t);
            assert!((0.35 - 1e-6..=1.0 + 1e-6).contains(&o));
            t += 0.013;
        }
    }

    #[test]
    fn hidden_indicator_stops_pulsing() {
        let mut ind = Indicator::new(
            Vec3::ZERO,
            1.0,
            BreathingPulse {
                period_sec: 2.0,
                min_opacity: 0.35,
                max_opacity: 1.0,
            },
        );
        ind.advance(0.3);
        assert!(ind.opacity() > 0.0);
        ind.hide();
        ind.advance(0.5);
        assert!(!ind.is_visible());
        assert_eq!(ind.opacity(), 0.0);
    }
}
