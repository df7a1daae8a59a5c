use super::district::{DistrictId, DistrictTree};
use super::{ElectionError, Result};
use std::collections::BTreeMap;

/// Write-once numeric values per district, bound to one root district.
///
/// Lookups of districts without a recorded value fall back to the sum of
/// their children, which is only known when every child is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictValues {
    root: DistrictId,
    values: BTreeMap<DistrictId, Option<u32>>,
}

impl DistrictValues {
    pub fn new(root: DistrictId) -> Self {
        Self {
            root,
            values: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> DistrictId {
        self.root
    }

    pub fn get(&self, tree: &DistrictTree, district: DistrictId) -> Option<u32> {
        if let Some(Some(value)) = self.values.get(&district) {
            return Some(*value);
        }

        let district = tree.get(district)?;
        let mut children = district.children().peekable();
        children.peek()?;
        children.try_fold(0u32, |sum, child| {
            sum.checked_add(self.get(tree, child.id())?)
        })
    }

    /// The value recorded for exactly this district, if any was recorded.
    pub fn recorded(&self, district: DistrictId) -> Option<Option<u32>> {
        self.values.get(&district).copied()
    }

    pub fn put(&mut self, tree: &DistrictTree, district: DistrictId, value: Option<u32>) -> Result<()> {
        let in_hierarchy = tree
            .get(self.root)
            .map_or(false, |root| root.contains(district));
        let district = match tree.get(district) {
            Some(district) if in_hierarchy => district,
            _ => return Err(ElectionError::OutOfHierarchy(format!("{:?}", district))),
        };
        if self.values.contains_key(&district.id()) {
            return Err(ElectionError::DuplicateValue(district.key()));
        }
        self.values.insert(district.id(), value);
        Ok(())
    }

    /// Records a value for the root and every descendant, looked up by key.
    ///
    /// Districts missing from `values` are recorded as unknown.
    pub fn put_all_by_key(
        &mut self,
        tree: &DistrictTree,
        values: &BTreeMap<String, Option<u32>>,
    ) -> Result<()> {
        let root = tree
            .get(self.root)
            .ok_or_else(|| ElectionError::OutOfHierarchy(format!("{:?}", self.root)))?;
        let districts: Vec<_> = std::iter::once(root).chain(root.all_children()).collect();
        for district in districts {
            let value = values.get(&district.key()).copied().flatten();
            self.put(tree, district.id(), value)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::district::ElectionAreaType;

    fn tree() -> (DistrictTree, DistrictId, DistrictId, DistrictId) {
        let mut tree = DistrictTree::new("Rethwisch", ElectionAreaType::Municipality);
        let district = tree.create_child(tree.root().id(), "Rethwisch").unwrap();
        let klein_boden = tree.create_child(district, "Klein Boden").unwrap();
        let rethwischdorf = tree.create_child(district, "Rethwischdorf").unwrap();
        (tree, district, klein_boden, rethwischdorf)
    }

    #[test]
    fn sums_children_when_all_known() {
        let (tree, district, klein_boden, rethwischdorf) = tree();
        let mut values = DistrictValues::new(tree.root().id());
        values.put(&tree, klein_boden, Some(273)).unwrap();
        assert_eq!(values.get(&tree, district), None);

        values.put(&tree, rethwischdorf, Some(717)).unwrap();
        assert_eq!(values.get(&tree, district), Some(990));
        assert_eq!(values.get(&tree, tree.root().id()), Some(990));
    }

    #[test]
    fn recorded_value_wins_over_children() {
        let (tree, district, klein_boden, _) = tree();
        let mut values = DistrictValues::new(tree.root().id());
        values.put(&tree, klein_boden, Some(5)).unwrap();
        values.put(&tree, district, Some(1200)).unwrap();
        assert_eq!(values.get(&tree, district), Some(1200));
    }

    #[test]
    fn explicit_unknown_falls_back_to_children() {
        let (tree, district, klein_boden, rethwischdorf) = tree();
        let mut values = DistrictValues::new(tree.root().id());
        values.put(&tree, district, None).unwrap();
        values.put(&tree, klein_boden, Some(1)).unwrap();
        values.put(&tree, rethwischdorf, Some(2)).unwrap();
        assert_eq!(values.get(&tree, district), Some(3));
    }

    #[test]
    fn leaves_without_value_are_unknown() {
        let (tree, _, klein_boden, _) = tree();
        let values = DistrictValues::new(tree.root().id());
        assert_eq!(values.get(&tree, klein_boden), None);
    }

    #[test]
    fn values_are_write_once() {
        let (tree, _, klein_boden, _) = tree();
        let mut values = DistrictValues::new(tree.root().id());
        values.put(&tree, klein_boden, None).unwrap();
        assert_eq!(
            values.put(&tree, klein_boden, Some(1)),
            Err(ElectionError::DuplicateValue(
                "Rethwisch, Klein Boden".to_string()
            ))
        );
    }

    #[test]
    fn rejects_districts_outside_the_root() {
        let (tree, district, klein_boden, _) = tree();
        let mut values = DistrictValues::new(district);
        assert!(matches!(
            values.put(&tree, tree.root().id(), Some(1)),
            Err(ElectionError::OutOfHierarchy(_))
        ));
        assert!(values.put(&tree, klein_boden, Some(1)).is_ok());

        let (other, _, other_station, _) = self::tree();
        assert!(matches!(
            values.put(&other, other_station, Some(1)),
            Err(ElectionError::OutOfHierarchy(_))
        ));
    }

    #[test]
    fn put_all_by_key_covers_every_district() {
        let (tree, district, klein_boden, rethwischdorf) = tree();
        let mut values = DistrictValues::new(tree.root().id());
        let mut by_key = BTreeMap::new();
        by_key.insert("Rethwisch, Klein Boden".to_string(), Some(166));
        by_key.insert("Rethwisch, Rethwischdorf".to_string(), Some(435));
        values.put_all_by_key(&tree, &by_key).unwrap();

        assert_eq!(values.get(&tree, klein_boden), Some(166));
        assert_eq!(values.get(&tree, rethwischdorf), Some(435));
        assert_eq!(values.get(&tree, district), Some(601));
        assert_eq!(values.recorded(district), Some(None));
        assert!(values.put(&tree, district, Some(1)).is_err());
    }
}
