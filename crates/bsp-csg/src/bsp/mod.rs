//! Binary Space Partitioning tree: the boolean engine behind [`Csg`](crate::Csg).
//!
//! A BSP tree recursively partitions space using planes derived from its
//! input polygons. Besides storing the polygons, the tree encodes a solid:
//! the region behind a node with no back child is inside, the region in
//! front of a node with no front child is outside. That makes three
//! operations enough to build every boolean:
//!
//! - [`BspTree::clip_polygons`]: remove the parts of a polygon set that lie
//!   inside the tree's solid.
//! - [`BspTree::clip_to`]: clip the tree's own polygons against another tree.
//! - [`BspTree::invert`]: swap solid and empty space.
//!
//! # Example
//!
//! ```ignore
//! use bsp_csg::BspTree;
//!
//! let mut a = BspTree::from_polygons(a_polygons);
//! let mut b = BspTree::from_polygons(b_polygons);
//!
//! // Keep only the surface of `a` that lies outside `b`, and vice versa.
//! a.clip_to(&b);
//! b.clip_to(&a);
//! ```
//!
//! # Architecture
//!
//! - [`BspTree`]: The container holding the root node and the tolerance
//! - [`BspNode`]: Internal nodes storing a splitting plane and coplanar polygons
//! - [`PlaneSelector`]: Strategy trait for choosing splitting planes

mod node;
mod selector;
mod tree;

pub use node::BspNode;
pub use selector::{FirstPolygon, PlaneSelector};
pub use tree::BspTree;
