//! Category hierarchy held as an arena of nodes indexed by category id.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::error::{StoreError, StoreResult};
use crate::models::Category;

#[derive(Clone, Debug)]
struct Node {
    id: i32,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct CategoryTree {
    nodes: Vec<Node>,
    index: HashMap<i32, usize>,
}

impl CategoryTree {
    /// Builds the arena from `(id, parent_id)` pairs. A parent id that names
    /// no category leaves the node at the root.
    pub fn new(links: impl IntoIterator<Item = (i32, Option<i32>)>) -> Self {
        let links: Vec<(i32, Option<i32>)> = links.into_iter().collect();
        let mut tree = CategoryTree::default();
        for (id, _) in &links {
            tree.index.insert(*id, tree.nodes.len());
            tree.nodes.push(Node {
                id: *id,
                parent: None,
                children: Vec::new(),
            });
        }
        for (id, parent_id) in links {
            let (Some(&node), Some(&parent)) = (
                tree.index.get(&id),
                parent_id.and_then(|p| tree.index.get(&p)),
            ) else {
                continue;
            };
            tree.nodes[node].parent = Some(parent);
            tree.nodes[parent].children.push(node);
        }
        tree
    }

    pub fn contains(&self, id: i32) -> bool {
        self.index.contains_key(&id)
    }

    pub fn parent(&self, id: i32) -> Option<i32> {
        let node = *self.index.get(&id)?;
        self.nodes[node].parent.map(|p| self.nodes[p].id)
    }

    /// Ids from the parent of `id` up to its root. Stops if the stored data
    /// already loops.
    pub fn ancestors(&self, id: i32) -> Vec<i32> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.index.get(&id).and_then(|&n| self.nodes[n].parent);
        while let Some(node) = current {
            let node_id = self.nodes[node].id;
            if !seen.insert(node_id) {
                break;
            }
            ancestors.push(node_id);
            current = self.nodes[node].parent;
        }
        ancestors
    }

    pub fn depth(&self, id: i32) -> usize {
        self.ancestors(id).len()
    }

    pub fn descendants(&self, id: i32) -> Vec<i32> {
        let Some(&start) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        let mut seen = HashSet::from([start]);
        let mut stack = self.nodes[start].children.clone();
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            found.push(self.nodes[node].id);
            stack.extend(self.nodes[node].children.iter().copied());
        }
        found
    }

    /// Checks that `category_id` (None for a category not stored yet) may
    /// hang under `parent_id`.
    pub fn check_parent(&self, category_id: Option<i32>, parent_id: i32) -> StoreResult<()> {
        if !self.contains(parent_id) {
            return Err(StoreError::Validation(format!(
                "parent category {} does not exist",
                parent_id
            )));
        }
        let Some(category_id) = category_id else {
            return Ok(());
        };
        if parent_id == category_id || self.ancestors(parent_id).contains(&category_id) {
            return Err(StoreError::CategoryCycle {
                category_id,
                parent_id,
            });
        }
        Ok(())
    }
}

/// A category with its subcategories, for the tree view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Nests categories under their parents. Siblings are ordered by
    /// `sort_order`, then id.
    pub fn nest(categories: Vec<Category>) -> Vec<CategoryNode> {
        let tree = CategoryTree::new(categories.iter().map(|c| (c.id, c.parent_id)));
        let mut by_id: HashMap<i32, Category> =
            categories.into_iter().map(|c| (c.id, c)).collect();

        let mut roots: Vec<i32> = by_id
            .keys()
            .copied()
            .filter(|id| tree.parent(*id).is_none())
            .collect();
        sort_siblings(&mut roots, &by_id);

        let mut placed = HashSet::new();
        let mut nested: Vec<CategoryNode> = roots
            .into_iter()
            .filter_map(|id| build_node(id, &tree, &mut by_id, &mut placed))
            .collect();

        // Members of a stored cycle have no root; surface them at the top.
        let mut stranded: Vec<i32> = by_id.keys().copied().collect();
        sort_siblings(&mut stranded, &by_id);
        for id in stranded {
            if let Some(node) = build_node(id, &tree, &mut by_id, &mut placed) {
                nested.push(node);
            }
        }
        nested
    }
}

fn sort_siblings(ids: &mut [i32], by_id: &HashMap<i32, Category>) {
    ids.sort_by_key(|id| (by_id.get(id).map(|c| c.sort_order).unwrap_or(0), *id));
}

fn build_node(
    id: i32,
    tree: &CategoryTree,
    by_id: &mut HashMap<i32, Category>,
    placed: &mut HashSet<i32>,
) -> Option<CategoryNode> {
    if !placed.insert(id) {
        return None;
    }
    let category = by_id.remove(&id)?;
    let mut child_ids: Vec<i32> = tree
        .index
        .get(&id)
        .map(|&node| {
            tree.nodes[node]
                .children
                .iter()
                .map(|&child| tree.nodes[child].id)
                .collect()
        })
        .unwrap_or_default();
    sort_siblings(&mut child_ids, by_id);
    let children = child_ids
        .into_iter()
        .filter_map(|child| build_node(child, tree, by_id, placed))
        .collect();
    Some(CategoryNode { category, children })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    // 1 ─┬─ 2 ── 4
    //    └─ 3
    // 5
    fn tree() -> CategoryTree {
        CategoryTree::new([(1, None), (2, Some(1)), (3, Some(1)), (4, Some(2)), (5, None)])
    }

    #[test]
    fn walks_up_and_down() {
        let tree = tree();
        assert_eq!(tree.ancestors(4), vec![2, 1]);
        assert_eq!(tree.depth(1), 0);
        let mut below = tree.descendants(1);
        below.sort();
        assert_eq!(below, vec![2, 3, 4]);
        assert_eq!(tree.parent(3), Some(1));
    }

    #[test]
    fn rejects_cycles_and_missing_parents() {
        let tree = tree();
        assert!(tree.check_parent(Some(4), 5).is_ok());
        assert!(tree.check_parent(None, 4).is_ok());
        assert!(matches!(
            tree.check_parent(Some(1), 4),
            Err(StoreError::CategoryCycle {
                category_id: 1,
                parent_id: 4
            })
        ));
        assert!(matches!(
            tree.check_parent(Some(2), 2),
            Err(StoreError::CategoryCycle { .. })
        ));
        assert!(matches!(
            tree.check_parent(Some(2), 99),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn stored_loops_do_not_hang() {
        let tree = CategoryTree::new([(1, Some(2)), (2, Some(1))]);
        assert_eq!(tree.ancestors(1), vec![2]);
        assert_eq!(tree.descendants(1), vec![2]);
    }

    fn category(id: i32, parent_id: Option<i32>, sort_order: i32) -> Category {
        let now = Utc::now();
        Category {
            id,
            name: format!("Categoría {id}"),
            slug: format!("categoria-{id}"),
            description: None,
            image_url: None,
            parent_id,
            sort_order,
            is_active: true,
            products_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn nests_children_in_sort_order() {
        let nested = CategoryNode::nest(vec![
            category(1, None, 2),
            category(2, Some(1), 1),
            category(3, Some(1), 0),
            category(4, None, 1),
        ]);
        let roots: Vec<i32> = nested.iter().map(|n| n.category.id).collect();
        assert_eq!(roots, vec![4, 1]);
        let children: Vec<i32> = nested[1].children.iter().map(|n| n.category.id).collect();
        assert_eq!(children, vec![3, 2]);
    }

    #[test]
    fn cyclic_rows_still_appear_once() {
        let nested = CategoryNode::nest(vec![category(1, Some(2), 0), category(2, Some(1), 0)]);
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].category.id, 1);
        assert_eq!(nested[0].children.len(), 1);
    }
}
