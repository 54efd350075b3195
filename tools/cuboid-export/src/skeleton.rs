//! Bone hierarchy
//!
//! Resolves the host's flat bone list (name + parent name) into an indexed
//! tree. Child order is the order in which bones appear in the host list and
//! is preserved all the way into the exported document.

use glam::DVec3;
use hashbrown::HashMap;

use crate::error::HierarchyError;
use crate::scene::BoneDef;

/// Index of a bone in [`Skeleton::bones`]
pub type BoneId = usize;

#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    /// Head position in authoring space
    pub head: DVec3,
    pub parent: Option<BoneId>,
    pub children: Vec<BoneId>,
}

/// Validated bone tree with exactly one root
#[derive(Debug, Clone)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

impl Skeleton {
    /// Build a skeleton from the host's bone declarations.
    ///
    /// Fails if names collide, a parent is unknown, the parent links contain
    /// a cycle, or there is not exactly one root.
    pub fn from_defs(defs: &[BoneDef]) -> Result<Self, HierarchyError> {
        let mut ids: HashMap<&str, BoneId> = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            if ids.insert(def.name.as_str(), i).is_some() {
                return Err(HierarchyError::DuplicateBone(def.name.clone()));
            }
        }

        let mut bones: Vec<Bone> = defs
            .iter()
            .map(|def| Bone {
                name: def.name.clone(),
                head: def.head,
                parent: None,
                children: Vec::new(),
            })
            .collect();

        for (i, def) in defs.iter().enumerate() {
            let Some(parent_name) = def.parent.as_deref() else {
                continue;
            };
            let parent = *ids
                .get(parent_name)
                .ok_or_else(|| HierarchyError::UnknownParent {
                    bone: def.name.clone(),
                    parent: parent_name.to_string(),
                })?;
            bones[i].parent = Some(parent);
            bones[parent].children.push(i);
        }

        let skeleton = Self { bones };
        skeleton.check_acyclic()?;
        skeleton.root()?;
        Ok(skeleton)
    }

    fn check_acyclic(&self) -> Result<(), HierarchyError> {
        for (i, bone) in self.bones.iter().enumerate() {
            let mut current = bone.parent;
            let mut steps = 0;
            while let Some(parent) = current {
                steps += 1;
                if parent == i || steps > self.bones.len() {
                    return Err(HierarchyError::Cycle(bone.name.clone()));
                }
                current = self.bones[parent].parent;
            }
        }
        Ok(())
    }

    /// The unique parentless bone
    pub fn root(&self) -> Result<BoneId, HierarchyError> {
        let roots: Vec<BoneId> = self
            .bones
            .iter()
            .enumerate()
            .filter(|(_, bone)| bone.parent.is_none())
            .map(|(i, _)| i)
            .collect();

        match roots.as_slice() {
            [] => Err(HierarchyError::NoRoot),
            [root] => Ok(*root),
            _ => Err(HierarchyError::MultipleRoots(
                roots.iter().map(|&i| self.bones[i].name.clone()).collect(),
            )),
        }
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone(&self, id: BoneId) -> &Bone {
        &self.bones[id]
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Look up a bone by name
    pub fn find(&self, name: &str) -> Option<BoneId> {
        self.bones.iter().position(|bone| bone.name == name)
    }

    /// Head of the bone's parent, or the origin for the root
    pub fn parent_head(&self, id: BoneId) -> DVec3 {
        self.bones[id]
            .parent
            .map(|parent| self.bones[parent].head)
            .unwrap_or(DVec3::ZERO)
    }

    /// Bones in depth-first pre-order, paired with their depth
    pub fn walk(&self) -> Result<Vec<(BoneId, usize)>, HierarchyError> {
        let mut order = Vec::with_capacity(self.bones.len());
        let mut stack = vec![(self.root()?, 0)];
        while let Some((id, depth)) = stack.pop() {
            order.push((id, depth));
            for &child in self.bones[id].children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        Ok(order)
    }
}
