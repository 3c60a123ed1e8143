//! Arena-backed AVL tree holding all roots.
//!
//! Nodes live in a generational arena and refer to their children by
//! [`Index`]. There are no parent links and no deletion: the tree only grows.

use std::cmp::Ordering;

use generational_arena::{Arena, Index};

use crate::domain::entities::{Derivation, Root};

/// Result of inserting a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Added,
    AlreadyExists,
}

/// Tree node: one root and the words derived from it.
#[derive(Debug)]
pub struct RootNode {
    root: Root,
    left: Option<Index>,
    right: Option<Index>,
    /// Height of the subtree rooted here, leaves are 1
    height: usize,
    derivations: Vec<Derivation>,
}

impl RootNode {
    fn new(root: Root) -> Self {
        Self {
            root,
            left: None,
            right: None,
            height: 1,
            derivations: Vec::new(),
        }
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn derivations(&self) -> &[Derivation] {
        &self.derivations
    }

    /// Append a derivation unless the word is already recorded.
    ///
    /// Returns `true` if it was appended.
    pub fn add_derivation(&mut self, derivation: Derivation) -> bool {
        if self.derivations.iter().any(|d| d.word == derivation.word) {
            return false;
        }
        self.derivations.push(derivation);
        true
    }
}

/// Self-balancing (AVL) ordered store of roots.
#[derive(Debug)]
pub struct RootStore {
    nodes: Arena<RootNode>,
    top: Option<Index>,
}

impl Default for RootStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RootStore {
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            top: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Height of the whole tree, 0 when empty.
    pub fn height(&self) -> usize {
        self.height_of(self.top)
    }

    pub(crate) fn top(&self) -> Option<Index> {
        self.top
    }

    pub(crate) fn node(&self, idx: Index) -> Option<&RootNode> {
        self.nodes.get(idx)
    }

    pub(crate) fn children(&self, idx: Index) -> (Option<Index>, Option<Index>) {
        self.nodes
            .get(idx)
            .map(|n| (n.left, n.right))
            .unwrap_or((None, None))
    }

    /// Insert a root, rebalancing on the way back up.
    pub fn insert(&mut self, root: Root) -> InsertOutcome {
        if self.find_index(root.as_str()).is_some() {
            return InsertOutcome::AlreadyExists;
        }
        let new_idx = self.nodes.insert(RootNode::new(root));
        let top = self.insert_at(self.top, new_idx);
        self.top = Some(top);
        InsertOutcome::Added
    }

    pub fn find(&self, root: &str) -> Option<&RootNode> {
        self.find_index(root).and_then(|idx| self.nodes.get(idx))
    }

    pub fn find_mut(&mut self, root: &str) -> Option<&mut RootNode> {
        let idx = self.find_index(root)?;
        self.nodes.get_mut(idx)
    }

    pub fn contains(&self, root: &str) -> bool {
        self.find_index(root).is_some()
    }

    /// Iterative descent by lexicographic comparison.
    fn find_index(&self, root: &str) -> Option<Index> {
        let mut current = self.top;
        while let Some(idx) = current {
            let node = self.nodes.get(idx)?;
            current = match root.cmp(node.root.as_str()) {
                Ordering::Equal => return Some(idx),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Nodes in ascending root order. Each call starts a fresh traversal.
    pub fn iter(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self)
    }

    /// Roots in ascending order.
    pub fn list_all(&self) -> impl Iterator<Item = &Root> + '_ {
        self.iter().map(RootNode::root)
    }

    /// Check |height(left) - height(right)| <= 1 and cached heights for every node.
    pub fn is_balanced(&self) -> bool {
        self.check_subtree(self.top).is_some()
    }

    fn check_subtree(&self, at: Option<Index>) -> Option<usize> {
        let Some(idx) = at else {
            return Some(0);
        };
        let node = self.nodes.get(idx)?;
        let left = self.check_subtree(node.left)?;
        let right = self.check_subtree(node.right)?;
        let height = 1 + left.max(right);
        (left.abs_diff(right) <= 1 && height == node.height).then_some(height)
    }

    // ------------- insertion and rotations -------------

    /// Insert `new_idx` into the subtree at `at`, returning the subtree's new top.
    fn insert_at(&mut self, at: Option<Index>, new_idx: Index) -> Index {
        let Some(idx) = at else {
            return new_idx;
        };

        match self.compare(new_idx, idx) {
            Ordering::Less => {
                let left = self.nodes[idx].left;
                let new_left = self.insert_at(left, new_idx);
                self.nodes[idx].left = Some(new_left);
            }
            Ordering::Greater => {
                let right = self.nodes[idx].right;
                let new_right = self.insert_at(right, new_idx);
                self.nodes[idx].right = Some(new_right);
            }
            // duplicates are rejected before descending
            Ordering::Equal => return idx,
        }

        self.update_height(idx);
        self.rebalance(idx, new_idx)
    }

    fn rebalance(&mut self, idx: Index, new_idx: Index) -> Index {
        let balance = self.balance_factor(idx);
        let (left, right) = self.children(idx);

        if balance > 1 {
            if let Some(left) = left {
                match self.compare(new_idx, left) {
                    Ordering::Less => return self.rotate_right(idx),
                    Ordering::Greater => {
                        let new_left = self.rotate_left(left);
                        self.nodes[idx].left = Some(new_left);
                        return self.rotate_right(idx);
                    }
                    Ordering::Equal => {}
                }
            }
        }

        if balance < -1 {
            if let Some(right) = right {
                match self.compare(new_idx, right) {
                    Ordering::Greater => return self.rotate_left(idx),
                    Ordering::Less => {
                        let new_right = self.rotate_right(right);
                        self.nodes[idx].right = Some(new_right);
                        return self.rotate_left(idx);
                    }
                    Ordering::Equal => {}
                }
            }
        }

        idx
    }

    fn rotate_right(&mut self, y: Index) -> Index {
        let Some(x) = self.nodes[y].left else {
            return y;
        };
        let t2 = self.nodes[x].right;

        self.nodes[x].right = Some(y);
        self.nodes[y].left = t2;

        self.update_height(y);
        self.update_height(x);
        x
    }

    fn rotate_left(&mut self, x: Index) -> Index {
        let Some(y) = self.nodes[x].right else {
            return x;
        };
        let t2 = self.nodes[y].left;

        self.nodes[y].left = Some(x);
        self.nodes[x].right = t2;

        self.update_height(x);
        self.update_height(y);
        y
    }

    fn compare(&self, a: Index, b: Index) -> Ordering {
        self.nodes[a].root.cmp(&self.nodes[b].root)
    }

    fn height_of(&self, idx: Option<Index>) -> usize {
        idx.and_then(|i| self.nodes.get(i)).map_or(0, |n| n.height)
    }

    fn update_height(&mut self, idx: Index) {
        let (left, right) = self.children(idx);
        let height = 1 + self.height_of(left).max(self.height_of(right));
        self.nodes[idx].height = height;
    }

    fn balance_factor(&self, idx: Index) -> isize {
        let (left, right) = self.children(idx);
        self.height_of(left) as isize - self.height_of(right) as isize
    }
}

/// Lazy in-order traversal using an explicit stack.
pub struct InOrderIterator<'a> {
    store: &'a RootStore,
    stack: Vec<Index>,
    current: Option<Index>,
}

impl<'a> InOrderIterator<'a> {
    fn new(store: &'a RootStore) -> Self {
        Self {
            store,
            stack: Vec::new(),
            current: store.top,
        }
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = &'a RootNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.current {
            self.stack.push(idx);
            self.current = self.store.nodes.get(idx).and_then(|n| n.left);
        }
        let idx = self.stack.pop()?;
        let node = self.store.nodes.get(idx)?;
        self.current = node.right;
        Some(node)
    }
}
