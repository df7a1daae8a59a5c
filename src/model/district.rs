use super::keys::escape;
use super::{ElectionError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Kind of administrative area an election is held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElectionAreaType {
    /// Kreisangehörige Gemeinde
    Municipality,
    /// Kreisfreie Stadt
    IndependentCity,
    /// Kreis
    County,
}

impl std::fmt::Display for ElectionAreaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElectionAreaType::Municipality => write!(f, "municipality"),
            ElectionAreaType::IndependentCity => write!(f, "county-independent city"),
            ElectionAreaType::County => write!(f, "county"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistrictKind {
    Root(ElectionAreaType),
    /// Wahlkreis
    District,
    /// Wahlbezirk
    PollingStation,
}

impl std::fmt::Display for DistrictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistrictKind::Root(area) => write!(f, "{}", area),
            DistrictKind::District => write!(f, "district"),
            DistrictKind::PollingStation => write!(f, "polling station"),
        }
    }
}

/// Handle of a district inside one [`DistrictTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DistrictId {
    tree: Uuid,
    index: usize,
}

#[derive(Debug, Clone)]
struct DistrictNode {
    name: String,
    kind: DistrictKind,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Arena holding an election's district hierarchy.
///
/// Index 0 is the root. Nodes are only ever appended, so a [`DistrictId`]
/// stays valid for the lifetime of the tree.
#[derive(Debug, Clone)]
pub struct DistrictTree {
    id: Uuid,
    area_type: ElectionAreaType,
    nodes: Vec<DistrictNode>,
}

impl DistrictTree {
    pub fn new(name: impl Into<String>, area_type: ElectionAreaType) -> Self {
        Self {
            id: Uuid::new_v4(),
            area_type,
            nodes: vec![DistrictNode {
                name: name.into(),
                kind: DistrictKind::Root(area_type),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> District<'_> {
        District {
            tree: self,
            index: 0,
        }
    }

    pub fn area_type(&self) -> ElectionAreaType {
        self.area_type
    }

    /// Resolves an id, returning `None` for ids of other trees.
    pub fn get(&self, id: DistrictId) -> Option<District<'_>> {
        if id.tree == self.id && id.index < self.nodes.len() {
            Some(District {
                tree: self,
                index: id.index,
            })
        } else {
            None
        }
    }

    /// Resolves an id or fails with an out-of-hierarchy error.
    pub fn resolve(&self, id: DistrictId) -> Result<District<'_>> {
        self.get(id)
            .ok_or_else(|| ElectionError::OutOfHierarchy(format!("{:?}", id)))
    }

    pub fn create_child(&mut self, parent: DistrictId, name: impl Into<String>) -> Result<DistrictId> {
        let name = name.into();
        let parent_district = self.resolve(parent)?;
        let kind = match parent_district.kind() {
            DistrictKind::Root(_) => DistrictKind::District,
            DistrictKind::District => DistrictKind::PollingStation,
            DistrictKind::PollingStation => {
                return Err(ElectionError::LeafDistrict(parent_district.name().to_string()))
            }
        };
        if parent_district.children().any(|child| child.name() == name) {
            return Err(ElectionError::DuplicateDistrict {
                name,
                parent: parent_district.name().to_string(),
            });
        }

        let index = self.nodes.len();
        self.nodes.push(DistrictNode {
            name,
            kind,
            parent: Some(parent.index),
            children: Vec::new(),
        });
        self.nodes[parent.index].children.push(index);
        Ok(DistrictId {
            tree: self.id,
            index,
        })
    }

    /// All districts in pre-order, the root first.
    pub fn iter(&self) -> impl Iterator<Item = District<'_>> {
        std::iter::once(self.root()).chain(self.root().all_children())
    }

    /// Sub-districts (Wahlkreise) in creation order.
    pub fn sub_districts(&self) -> impl Iterator<Item = District<'_>> {
        self.iter().filter(|d| d.kind() == DistrictKind::District)
    }

    pub fn polling_stations(&self) -> impl Iterator<Item = District<'_>> {
        self.iter().filter(|d| d.kind() == DistrictKind::PollingStation)
    }

    pub fn find_by_key(&self, key: &str) -> Option<District<'_>> {
        self.iter().find(|d| d.key() == key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Borrowed view of a single node of a [`DistrictTree`].
#[derive(Clone, Copy)]
pub struct District<'a> {
    tree: &'a DistrictTree,
    index: usize,
}

impl<'a> District<'a> {
    fn node(&self) -> &'a DistrictNode {
        &self.tree.nodes[self.index]
    }

    fn at(&self, index: usize) -> District<'a> {
        District {
            tree: self.tree,
            index,
        }
    }

    pub fn id(&self) -> DistrictId {
        DistrictId {
            tree: self.tree.id,
            index: self.index,
        }
    }

    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    pub fn kind(&self) -> DistrictKind {
        self.node().kind
    }

    pub fn parent(&self) -> Option<District<'a>> {
        self.node().parent.map(|index| self.at(index))
    }

    pub fn children(&self) -> impl Iterator<Item = District<'a>> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&index| District { tree, index })
    }

    /// Every descendant in pre-order.
    pub fn all_children(&self) -> Vec<District<'a>> {
        let mut result = Vec::new();
        let mut stack: Vec<usize> = self.node().children.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            result.push(self.at(index));
            stack.extend(self.tree.nodes[index].children.iter().rev());
        }
        result
    }

    /// True if `other` is this district or one of its descendants.
    pub fn contains(&self, other: DistrictId) -> bool {
        if other.tree != self.tree.id {
            return false;
        }
        let mut current = Some(other.index);
        while let Some(index) = current {
            if index == self.index {
                return true;
            }
            current = self.tree.nodes.get(index).and_then(|node| node.parent);
        }
        false
    }

    /// The sub-district a polling station belongs to, or the district itself.
    pub fn sub_district(&self) -> Option<District<'a>> {
        match self.kind() {
            DistrictKind::Root(_) => None,
            DistrictKind::District => Some(*self),
            DistrictKind::PollingStation => self.parent(),
        }
    }

    pub fn key(&self) -> String {
        match self.parent() {
            None => String::new(),
            Some(parent) => escape(&parent.key(), ", ", self.name(), ""),
        }
    }
}

impl std::fmt::Debug for District<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("District")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

impl std::fmt::Display for District<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl PartialEq for District<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for District<'_> {}

impl PartialOrd for District<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for District<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parent()
            .cmp(&other.parent())
            .then_with(|| self.name().cmp(other.name()))
            .then_with(|| self.id().cmp(&other.id()))
    }
}
