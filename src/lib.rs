//! Density-based clustering for any metric space.
//!
//! `dbscan` is a small, backend-agnostic DBSCAN implementation. Points are
//! anything implementing [`Point`]; the engine borrows them and returns the
//! clusters it finds.
//!
//! The primary public API is under [`cluster`](mod@cluster), which provides:
//! - [`Dbscan`] and the [`cluster()`] shorthand
//! - the [`find_neighbours`] and [`expand_cluster`] primitives
//! - [`NamedPoint`], a ready-made Euclidean point

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{
    cluster, expand_cluster, find_neighbours, Clustering, Dbscan, NamedPoint, Point, Visit,
    VisitationMap,
};
pub use error::{Error, Result};
