//! Partial rows, one column at a time.

use crate::cells::CellState;
use std::ops::Index;

pub(crate) const NO_PARENT: u32 = u32::MAX;

/// A partial row: the cell at column `depth - 1`, and a link to the
/// node holding the columns before it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Node {
    pub cell: CellState,
    /// Number of decided columns.
    pub depth: u32,
    pub parent: u32,
    /// The last few cells, packed in base `states`.
    pub recent: u64,
}

/// Nodes of one enumeration.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    /// The node with no decided columns.
    pub fn root(&mut self) -> u32 {
        self.push(NO_PARENT, 0, 0, 0)
    }

    /// Adds a node and returns its id.
    pub fn push(&mut self, parent: u32, depth: u32, cell: CellState, recent: u64) -> u32 {
        self.nodes.push(Node {
            cell,
            depth,
            parent,
            recent,
        });
        (self.nodes.len() - 1) as u32
    }

    /// The ancestor of a node with `depth` decided columns.
    pub fn ancestor(&self, mut id: u32, depth: u32) -> u32 {
        while self.nodes[id as usize].depth > depth {
            id = self.nodes[id as usize].parent;
        }
        id
    }

    /// Writes the decided columns of a node into `row`.
    pub fn fill(&self, mut id: u32, row: &mut [CellState]) {
        while id != NO_PARENT {
            let node = self.nodes[id as usize];
            if node.depth == 0 {
                break;
            }
            row[node.depth as usize - 1] = node.cell;
            id = node.parent;
        }
    }
}

impl Index<u32> for Arena {
    type Output = Node;

    fn index(&self, id: u32) -> &Node {
        &self.nodes[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains() {
        let mut arena = Arena::default();
        let root = arena.root();
        let a = arena.push(root, 1, 1, 1);
        let b = arena.push(a, 2, 0, 2);
        let c = arena.push(b, 3, 2, 5);
        let d = arena.push(a, 2, 1, 3);
        let mut row = [9; 3];
        arena.fill(c, &mut row);
        assert_eq!(row, [1, 0, 2]);
        assert_eq!(arena.ancestor(c, 1), a);
        assert_eq!(arena.ancestor(d, 1), a);
        assert_eq!(arena.ancestor(c, 0), root);
        assert_eq!(arena[d].parent, a);
    }
}
