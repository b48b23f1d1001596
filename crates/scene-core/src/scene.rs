//! Scene graph model built once from the decoded room model.
//!
//! Nodes live in a flat arena addressed by [`NodeId`]; parents and children
//! are indices into it. Only local transforms are stored, world matrices are
//! derived on demand by walking the parent chain.

use glam::{Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Half-line used for picking. `direction` is not required to be unit length:
/// rays moved into node-local space keep the world-space parameter `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    pub fn transformed(&self, m: &Mat4) -> Ray {
        Ray {
            origin: m.transform_point3(self.origin),
            direction: m.transform_vector3(self.direction),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self { min, max })
    }

    /// Slab test. Returns the entry parameter (or exit, when the origin is inside).
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;
        let t_near = t0.min(t1).max_element();
        let t_far = t0.max(t1).min_element();
        if t_near.is_nan() || t_far.is_nan() || t_near > t_far || t_far < 0.0 {
            return None;
        }
        Some(if t_near >= 0.0 { t_near } else { t_far })
    }
}

/// Möller–Trumbore, double sided. Returns the ray parameter of the hit.
#[inline]
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let e1 = b - a;
    let e2 = c - a;
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1e-12 {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

/// CPU-side copy of a node's triangles, kept for picking.
#[derive(Clone, Debug, Default)]
pub struct MeshGeometry {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
    bounds: Option<Aabb>,
}

impl MeshGeometry {
    /// An empty `indices` list means the positions are a plain triangle list.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::from_points(&positions);
        Self {
            positions,
            indices,
            bounds,
        }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        if self.indices.is_empty() {
            self.positions.len() / 3
        } else {
            self.indices.len() / 3
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.triangle_count()).filter_map(move |i| {
            let idx = |k: usize| -> Option<Vec3> {
                let vi = if self.indices.is_empty() {
                    i * 3 + k
                } else {
                    self.indices[i * 3 + k] as usize
                };
                self.positions.get(vi).copied()
            };
            Some([idx(0)?, idx(1)?, idx(2)?])
        })
    }

    /// Nearest hit of a (node-local) ray against this mesh.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        self.bounds?.intersect_ray(ray)?;
        self.triangles()
            .filter_map(|[a, b, c]| ray_triangle(ray, a, b, c))
            .min_by(|x, y| x.total_cmp(y))
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local: Transform,
    pub mesh: Option<MeshGeometry>,
}

impl SceneNode {
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        local: Transform,
        mesh: Option<MeshGeometry>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = parent.filter(|p| p.0 < self.nodes.len());
        self.nodes.push(SceneNode {
            name: name.into(),
            parent,
            children: Vec::new(),
            local,
            mesh,
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// Depth-first, pre-order, roots in insertion order.
    pub fn traverse(&self, mut visit: impl FnMut(NodeId, &SceneNode)) {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            visit(id, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        let mut cur = Some(id);
        while let Some(c) = cur {
            match self.nodes.get(c.0) {
                Some(node) => {
                    m = node.local.matrix() * m;
                    cur = node.parent;
                }
                None => break,
            }
        }
        m
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshGeometry {
        // unit square in the XY plane, facing +Z
        MeshGeometry::new(
            vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn traverse_is_preorder() {
        let mut g = SceneGraph::new();
        let room = g.add_node("Room", None, Transform::default(), None);
        let desk = g.add_node("Desk", Some(room), Transform::default(), None);
        g.add_node("Lamp", Some(desk), Transform::default(), None);
        g.add_node("Chair", Some(room), Transform::default(), None);
        g.add_node("Sky", None, Transform::default(), None);

        let mut order = Vec::new();
        g.traverse(|_, n| order.push(n.name.clone()));
        assert_eq!(order, ["Room", "Desk", "Lamp", "Chair", "Sky"]);
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut g = SceneGraph::new();
        let parent = g.add_node(
            "Shelf",
            None,
            Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)),
            None,
        );
        let child = g.add_node(
            "Book",
            Some(parent),
            Transform::from_translation(Vec3::new(0.0, 2.0, 0.0)),
            None,
        );
        let p = g.world_matrix(child).transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn mesh_ray_hits_front_and_back() {
        let mesh = quad();
        let front = Ray::new(Vec3::new(0.1, 0.1, 5.0), Vec3::NEG_Z);
        let t = mesh.intersect_ray(&front).expect("front hit");
        assert!((t - 5.0).abs() < 1e-5);

        let back = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::Z);
        assert!(mesh.intersect_ray(&back).is_some());

        let miss = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(mesh.intersect_ray(&miss).is_none());
    }

    #[test]
    fn aabb_from_inside_returns_exit() {
        let bb = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let t = bb.intersect_ray(&Ray::new(Vec3::ZERO, Vec3::X)).unwrap();
        assert!((t - 1.0).abs() < 1e-6);
        assert!(bb
            .intersect_ray(&Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::X))
            .is_none());
    }
}
