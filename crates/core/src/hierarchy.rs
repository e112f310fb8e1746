use crate::error::MalformedDatasetError;
use crate::model::{Branch, Dataset, Leaf, Tree};

/// Build the validated two-level tree from a raw dataset.
///
/// Consumes the dataset and returns a fresh `Tree` with derived subtree
/// weights. Branches are sorted by descending leaf count; the sort is
/// stable, so ties keep their input order (the order is significant
/// downstream for both layout position and color assignment).
pub fn build(dataset: Dataset) -> Result<Tree, MalformedDatasetError> {
    let root_name = dataset.name;
    let raw_branches = dataset
        .children
        .ok_or_else(|| MalformedDatasetError::MissingRootChildren(root_name.clone()))?;

    let mut branches = Vec::with_capacity(raw_branches.len());
    for raw in raw_branches {
        let name = raw.name;
        let raw_leaves = match raw.children {
            Some(leaves) if !leaves.is_empty() => leaves,
            _ => return Err(MalformedDatasetError::EmptyBranch(name)),
        };

        let mut leaves = Vec::with_capacity(raw_leaves.len());
        for raw_leaf in raw_leaves {
            let value = raw_leaf
                .numeric_value()
                .ok_or_else(|| MalformedDatasetError::MissingLeafValue(raw_leaf.name.clone()))?;
            // Leaf category defaults to the owning platform; ids missing
            // from the dataset are synthesized stably from input order.
            let category = raw_leaf.category.unwrap_or_else(|| name.clone());
            let id = raw_leaf
                .id
                .unwrap_or_else(|| format!("{}/{}", name, raw_leaf.name));
            leaves.push(Leaf {
                id,
                name: raw_leaf.name,
                category,
                value,
            });
        }

        let weight = leaves.iter().map(|l| l.value).sum();
        branches.push(Branch {
            name,
            weight,
            leaves,
        });
    }

    branches.sort_by(|a, b| b.leaves.len().cmp(&a.leaves.len()));
    let total = branches.iter().map(|b| b.weight).sum();
    tracing::debug!(
        branches = branches.len(),
        total,
        "built hierarchy `{root_name}`"
    );

    Ok(Tree {
        name: root_name,
        total,
        branches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(v: serde_json::Value) -> Dataset {
        serde_json::from_value(v).unwrap()
    }

    fn leaves(n: usize) -> Vec<serde_json::Value> {
        (0..n).map(|i| json!({"name": format!("g{i}"), "value": 1.0})).collect()
    }

    #[test]
    fn root_without_children_is_malformed() {
        let err = build(dataset(json!({"name": "root"}))).unwrap_err();
        assert_eq!(err, MalformedDatasetError::MissingRootChildren("root".into()));
    }

    #[test]
    fn empty_branch_is_malformed() {
        let err = build(dataset(json!({
            "name": "root",
            "children": [{"name": "Wii", "children": []}]
        })))
        .unwrap_err();
        assert_eq!(err, MalformedDatasetError::EmptyBranch("Wii".into()));
    }

    #[test]
    fn leaf_without_numeric_value_is_malformed() {
        let err = build(dataset(json!({
            "name": "root",
            "children": [{"name": "Wii", "children": [{"name": "Wii Sports"}]}]
        })))
        .unwrap_err();
        assert_eq!(err, MalformedDatasetError::MissingLeafValue("Wii Sports".into()));
    }

    #[test]
    fn string_values_are_accepted() {
        let tree = build(dataset(json!({
            "name": "root",
            "children": [{"name": "Wii", "children": [{"name": "Wii Sports", "value": "82.53"}]}]
        })))
        .unwrap();
        assert!((tree.branches[0].leaves[0].value - 82.53).abs() < 1e-12);
    }

    #[test]
    fn weights_are_subtree_sums() {
        let tree = build(dataset(json!({
            "name": "root",
            "children": [
                {"name": "A", "children": [
                    {"name": "a1", "value": 2.0},
                    {"name": "a2", "value": 3.0}
                ]},
                {"name": "B", "children": [
                    {"name": "b1", "value": 5.0},
                    {"name": "b2", "value": 1.0},
                    {"name": "b3", "value": 1.0}
                ]}
            ]
        })))
        .unwrap();
        // B first: three leaves against A's two.
        assert_eq!(tree.branches[0].name, "B");
        assert!((tree.branches[0].weight - 7.0).abs() < 1e-12);
        assert!((tree.branches[1].weight - 5.0).abs() < 1e-12);
        assert!((tree.total - 12.0).abs() < 1e-12);
    }

    #[test]
    fn sort_ties_keep_input_order() {
        let tree = build(dataset(json!({
            "name": "root",
            "children": [
                {"name": "A", "children": leaves(5)},
                {"name": "B", "children": leaves(5)},
                {"name": "C", "children": leaves(3)}
            ]
        })))
        .unwrap();
        let names: Vec<&str> = tree.branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn sort_moves_larger_branches_ahead() {
        let tree = build(dataset(json!({
            "name": "root",
            "children": [
                {"name": "A", "children": leaves(3)},
                {"name": "B", "children": leaves(5)},
                {"name": "C", "children": leaves(5)}
            ]
        })))
        .unwrap();
        let names: Vec<&str> = tree.branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[test]
    fn category_and_id_default_from_branch() {
        let tree = build(dataset(json!({
            "name": "root",
            "children": [{"name": "PS2", "children": [
                {"name": "Gran Turismo", "value": 10.95}
            ]}]
        })))
        .unwrap();
        let leaf = &tree.branches[0].leaves[0];
        assert_eq!(leaf.category, "PS2");
        assert_eq!(leaf.id, "PS2/Gran Turismo");
    }

    #[test]
    fn explicit_category_and_id_survive() {
        let tree = build(dataset(json!({
            "name": "root",
            "children": [{"name": "PS2", "children": [
                {"id": "gt3", "name": "Gran Turismo 3", "category": "PS2", "value": 14.98}
            ]}]
        })))
        .unwrap();
        assert_eq!(tree.branches[0].leaves[0].id, "gt3");
    }
}
