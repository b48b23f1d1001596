//! Pointer picking.
//!
//! The pointer is stored in normalized device coordinates and overwritten by
//! every input event. Once per frame `pick_frame` casts one ray through it
//! against the registered pickable nodes only.

use crate::camera::Camera;
use crate::scene::{NodeId, SceneGraph};
use glam::{Vec2, Vec3};

/// Map a position inside a viewport (pixels from its top-left corner) to NDC.
/// Positions inside the viewport land in [-1, 1]; +Y is up.
#[inline]
pub fn viewport_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    let w = width.max(1.0);
    let h = height.max(1.0);
    Vec2::new((x / w) * 2.0 - 1.0, -((y / h) * 2.0 - 1.0))
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub ndc: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    /// World-space distance from the camera eye.
    pub distance: f32,
    pub point: Vec3,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Interactive,
}

impl Cursor {
    pub fn from_hits(hits: &[Hit]) -> Self {
        if hits.is_empty() {
            Cursor::Default
        } else {
            Cursor::Interactive
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Interactive => "pointer",
        }
    }
}

#[derive(Debug, Default)]
pub struct Picker {
    pointer: PointerState,
    hits: Vec<Hit>,
}

impl Picker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins; nothing is queued.
    pub fn update_pointer(&mut self, x: f32, y: f32) {
        self.pointer.ndc = Vec2::new(x, y);
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Recompute the hit list for this frame, nearest first.
    pub fn pick_frame(
        &mut self,
        camera: &Camera,
        scene: &SceneGraph,
        targets: &[NodeId],
    ) -> &[Hit] {
        self.hits.clear();
        if targets.is_empty() {
            return &self.hits;
        }
        let ray = camera.ray_from_ndc(self.pointer.ndc);
        for &id in targets {
            let Some(mesh) = scene.node(id).and_then(|n| n.mesh.as_ref()) else {
                continue;
            };
            let world = scene.world_matrix(id);
            if world.determinant().abs() < f32::EPSILON {
                continue;
            }
            let local_ray = ray.transformed(&world.inverse());
            if let Some(t) = mesh.intersect_ray(&local_ray) {
                let point = ray.at(t);
                self.hits.push(Hit {
                    node: id,
                    distance: (point - ray.origin).length(),
                    point,
                });
            }
        }
        self.hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        &self.hits
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn nearest(&self) -> Option<&Hit> {
        self.hits.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::scene::{MeshGeometry, Transform};

    fn cube(half: f32) -> MeshGeometry {
        let p = |x: f32, y: f32, z: f32| Vec3::new(x * half, y * half, z * half);
        let positions = vec![
            p(-1.0, -1.0, -1.0),
            p(1.0, -1.0, -1.0),
            p(1.0, 1.0, -1.0),
            p(-1.0, 1.0, -1.0),
            p(-1.0, -1.0, 1.0),
            p(1.0, -1.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(-1.0, 1.0, 1.0),
        ];
        let indices = vec![
            0, 1, 2, 0, 2, 3, 4, 6, 5, 4, 7, 6, 0, 4, 5, 0, 5, 1, 3, 2, 6, 3, 6, 7, 0, 3, 7, 0, 7,
            4, 1, 5, 6, 1, 6, 2,
        ];
        MeshGeometry::new(positions, indices)
    }

    fn camera_looking_down_z() -> Camera {
        let mut cam = SceneConfig::default().camera(1.0);
        cam.eye = Vec3::new(0.0, 0.0, 10.0);
        cam.target = Vec3::ZERO;
        cam
    }

    #[test]
    fn ndc_of_viewport_corners_and_center() {
        assert_eq!(viewport_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(viewport_to_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(viewport_to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn ndc_stays_in_range_inside_viewport() {
        let (w, h) = (1280.0, 720.0);
        let mut x = 0.0;
        while x <= w {
            let mut y = 0.0;
            while y <= h {
                let n = viewport_to_ndc(x, y, w, h);
                assert!((-1.0..=1.0).contains(&n.x) && (-1.0..=1.0).contains(&n.y));
                y += 37.0;
            }
            x += 53.0;
        }
    }

    #[test]
    fn hits_are_sorted_nearest_first() {
        let mut g = SceneGraph::new();
        // inserted far-to-near so sorting is observable
        let far = g.add_node(
            "Far_Target",
            None,
            Transform::from_translation(Vec3::new(0.0, 0.0, -6.0)),
            Some(cube(0.5)),
        );
        let mid = g.add_node(
            "Mid_Target",
            None,
            Transform::from_translation(Vec3::new(0.0, 0.0, -2.0)),
            Some(cube(0.5)),
        );
        let near = g.add_node(
            "Near_Target",
            None,
            Transform::from_translation(Vec3::new(0.0, 0.0, 3.0)),
            Some(cube(0.5)),
        );

        let cam = camera_looking_down_z();
        let mut picker = Picker::new();
        picker.update_pointer(0.0, 0.0);
        let hits = picker.pick_frame(&cam, &g, &[far, mid, near]);
        let order: Vec<NodeId> = hits.iter().map(|h| h.node).collect();
        assert_eq!(order, vec![near, mid, far]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!((hits[0].distance - 6.5).abs() < 1e-3);
    }

    #[test]
    fn only_registered_targets_are_tested() {
        let mut g = SceneGraph::new();
        let blocker = g.add_node(
            "Wall",
            None,
            Transform::from_translation(Vec3::new(0.0, 0.0, 3.0)),
            Some(cube(2.0)),
        );
        let poster = g.add_node(
            "Poster_Target",
            None,
            Transform::default(),
            Some(cube(0.5)),
        );
        let cam = camera_looking_down_z();
        let mut picker = Picker::new();
        let hits = picker.pick_frame(&cam, &g, &[poster]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, poster);
        assert_ne!(hits[0].node, blocker);
    }

    #[test]
    fn last_pointer_write_wins() {
        let mut g = SceneGraph::new();
        let left = g.add_node(
            "Left_Target",
            None,
            Transform::from_translation(Vec3::new(-2.0, 0.0, 0.0)),
            Some(cube(0.5)),
        );
        let right = g.add_node(
            "Right_Target",
            None,
            Transform::from_translation(Vec3::new(2.0, 0.0, 0.0)),
            Some(cube(0.5)),
        );
        let cam = camera_looking_down_z();
        let aim = |p: Vec3| cam.view_projection().project_point3(p);
        let l = aim(Vec3::new(-2.0, 0.0, 0.0));
        let r = aim(Vec3::new(2.0, 0.0, 0.0));

        let mut picker = Picker::new();
        picker.update_pointer(l.x, l.y);
        picker.update_pointer(r.x, r.y);
        let hits = picker.pick_frame(&cam, &g, &[left, right]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, right);
        assert_eq!(picker.pointer().ndc, Vec2::new(r.x, r.y));
    }

    #[test]
    fn empty_targets_give_default_cursor() {
        let g = SceneGraph::new();
        let cam = camera_looking_down_z();
        let mut picker = Picker::new();
        let hits = picker.pick_frame(&cam, &g, &[]);
        assert!(hits.is_empty());
        assert_eq!(Cursor::from_hits(hits), Cursor::Default);
        assert_eq!(Cursor::Interactive.css(), "pointer");
    }
}
