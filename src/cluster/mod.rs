//! Density-based clustering over caller-supplied points.
//!
//! Callers describe their data through the [`Point`] trait: a stable identity
//! and a distance to another point of the same type. The engine never looks
//! inside a point, so coordinate vectors, strings under an edit distance, or
//! any other metric space element can be clustered the same way.
//!
//! ## DBSCAN
//!
//! Density-based clustering that can discover non-convex clusters and leaves
//! outliers (noise points) out of every cluster. DBSCAN does not require
//! specifying the number of clusters in advance.
//!
//! The result is a list of clusters in discovery order, each a list of
//! references into the caller's slice. [`Clustering::labels`] gives the same
//! answer as one `Option<usize>` per input point.
//!
//! ## Usage
//!
//! ```rust
//! use dbscan::cluster::{Clustering, Dbscan, NamedPoint};
//!
//! let data = vec![
//!     NamedPoint::new("a", [0.0, 0.0]),
//!     NamedPoint::new("b", [0.1, 0.1]),
//!     NamedPoint::new("c", [0.2, 0.0]),
//!     NamedPoint::new("d", [10.0, 10.0]),
//!     NamedPoint::new("e", [10.1, 10.1]),
//!     NamedPoint::new("f", [10.2, 10.0]),
//!     NamedPoint::new("g", [50.0, 50.0]),
//! ];
//!
//! let clusters = Dbscan::new(0.5, 2).cluster(&data).unwrap();
//! assert_eq!(clusters.len(), 2);
//!
//! // Noise as `None`
//! let labels = Dbscan::new(0.5, 2).labels(&data).unwrap();
//! assert_eq!(labels, vec![Some(0), Some(0), Some(0), Some(1), Some(1), Some(1), None]);
//! ```

mod dbscan;
mod point;
mod traits;

pub use dbscan::{cluster, expand_cluster, find_neighbours, Dbscan, Visit, VisitationMap};
pub use point::{NamedPoint, Point};
pub use traits::Clustering;
