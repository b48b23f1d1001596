//! Interaction registry.
//!
//! Every mesh-bearing node gets an explicit capability set decided once from
//! its authored name. The registry is built by a single traversal and offers
//! no way to add or remove entries afterwards.

use crate::constants::{TAG_IDLE_SPIN, TAG_PICKABLE};
use crate::scene::{NodeId, SceneGraph};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    IdleSpin,
    Pickable,
}

impl Capability {
    const fn bit(self) -> u8 {
        match self {
            Capability::IdleSpin => 1 << 0,
            Capability::Pickable => 1 << 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);

    #[must_use]
    pub fn with(self, c: Capability) -> Self {
        Capabilities(self.0 | c.bit())
    }

    pub fn contains(self, c: Capability) -> bool {
        self.0 & c.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A name substring that grants a capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRule {
    pub pattern: String,
    pub capability: Capability,
}

impl TagRule {
    pub fn new(pattern: impl Into<String>, capability: Capability) -> Self {
        Self {
            pattern: pattern.into(),
            capability,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRules {
    rules: Vec<TagRule>,
}

impl Default for TagRules {
    fn default() -> Self {
        Self::new(vec![
            TagRule::new(TAG_IDLE_SPIN, Capability::IdleSpin),
            TagRule::new(TAG_PICKABLE, Capability::Pickable),
        ])
    }
}

impl TagRules {
    pub fn new(rules: Vec<TagRule>) -> Self {
        Self { rules }
    }

    /// All matching rules contribute; tags are not mutually exclusive.
    pub fn classify(&self, name: &str) -> Capabilities {
        self.rules
            .iter()
            .filter(|r| !r.pattern.is_empty() && name.contains(r.pattern.as_str()))
            .fold(Capabilities::NONE, |caps, r| caps.with(r.capability))
    }
}

#[derive(Clone, Debug, Default)]
pub struct InteractionRegistry {
    idle: Vec<NodeId>,
    pickable: Vec<NodeId>,
}

impl InteractionRegistry {
    pub fn classify(scene: &SceneGraph, rules: &TagRules) -> Self {
        let mut reg = Self::default();
        scene.traverse(|id, node| {
            if !node.has_mesh() {
                return;
            }
            let caps = rules.classify(&node.name);
            if caps.contains(Capability::IdleSpin) {
                reg.idle.push(id);
            }
            if caps.contains(Capability::Pickable) {
                reg.pickable.push(id);
            }
        });
        log::info!(
            "[registry] nodes={} idle={} pickable={}",
            scene.len(),
            reg.idle.len(),
            reg.pickable.len()
        );
        reg
    }

    pub fn idle_nodes(&self) -> &[NodeId] {
        &self.idle
    }

    pub fn pickable_nodes(&self) -> &[NodeId] {
        &self.pickable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MeshGeometry, Transform};
    use glam::Vec3;

    fn tri() -> Option<MeshGeometry> {
        Some(MeshGeometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            Vec::new(),
        ))
    }

    #[test]
    fn classify_uses_explicit_rules() {
        let rules = TagRules::new(vec![TagRule::new("Spin", Capability::IdleSpin)]);
        assert!(rules.classify("CubeSpin").contains(Capability::IdleSpin));
        assert!(rules.classify("Minecraft_Block_1").is_empty());
    }

    #[test]
    fn node_with_both_tags_lands_in_both_sets() {
        let rules = TagRules::default();
        let caps = rules.classify("Minecraft_Block_Target");
        assert!(caps.contains(Capability::IdleSpin));
        assert!(caps.contains(Capability::Pickable));
    }

    #[test]
    fn registry_skips_untagged_and_meshless_nodes() {
        let mut g = SceneGraph::new();
        let root = g.add_node("Room", None, Transform::default(), None);
        let block = g.add_node("Minecraft_Block_Grass", Some(root), Transform::default(), tri());
        let poster = g.add_node("WallPoster_Target", Some(root), Transform::default(), tri());
        let both = g.add_node("Minecraft_Block_Target", Some(root), Transform::default(), tri());
        g.add_node("Desk", Some(root), Transform::default(), tri());
        // group node: tagged but carries no mesh
        g.add_node("Group_Target", Some(root), Transform::default(), None);

        let reg = InteractionRegistry::classify(&g, &TagRules::default());
        assert_eq!(reg.idle_nodes(), &[block, both]);
        assert_eq!(reg.pickable_nodes(), &[poster, both]);
    }
}
