//! Positional data join between existing scene nodes and a data sequence.

use itertools::{EitherOrBoth, Itertools};

use crate::domain::scene::NodeId;

/// Outcome of binding `data` to `existing` nodes by index.
///
/// The Nth datum binds to the Nth node. Reordering data of equal length therefore reuses
/// every node in place and only its bound datum changes.
#[derive(Debug)]
pub struct DataJoin<'d, T> {
    /// Nodes that keep a datum, in data order.
    pub update: Vec<(NodeId, &'d T)>,
    /// Data beyond the existing node count, in data order.
    pub enter: Vec<&'d T>,
    /// Nodes beyond the data length.
    pub exit: Vec<NodeId>,
}

impl<'d, T> DataJoin<'d, T> {
    pub fn positional(existing: &[NodeId], data: &'d [T]) -> Self {
        let mut join = Self {
            update: Vec::new(),
            enter: Vec::new(),
            exit: Vec::new(),
        };
        for pair in existing.iter().copied().zip_longest(data) {
            match pair {
                EitherOrBoth::Both(node, datum) => join.update.push((node, datum)),
                EitherOrBoth::Left(node) => join.exit.push(node),
                EitherOrBoth::Right(datum) => join.enter.push(datum),
            }
        }
        join
    }
}
