/*
Renders the shape of the root store for terminal display.
 */
use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::RootStore;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for RootStore {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(store: &RootStore, idx: Index) -> Tree<String> {
            let label = store
                .node(idx)
                .map(|n| format!("{} (h={})", n.root(), n.height()))
                .unwrap_or_default();
            let (left, right) = store.children(idx);
            let leaves: Vec<_> = [left, right]
                .into_iter()
                .flatten()
                .map(|child| build_tree(store, child))
                .collect();
            Tree::new(label).with_leaves(leaves)
        }

        match self.top() {
            Some(top) => build_tree(self, top),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
