//! The point capability consumed by the clustering engine.

use std::borrow::Cow;

/// A value that can be clustered.
///
/// The engine never builds or mutates points. It reads [`Point::identity`] to
/// key its bookkeeping and calls [`Point::distance_to`] to find neighbours.
///
/// Identities must be unique within one input set; duplicates are rejected
/// with [`Error::DuplicateIdentity`](crate::Error::DuplicateIdentity).
///
/// The engine treats the distance as symmetric. Neighbour queries always ask
/// the candidate for its distance to the query point
/// (`candidate.distance_to(point)`), so a directed distance yields consistent,
/// if non-textbook, results.
pub trait Point {
    /// Stable identity, unique within one input set.
    fn identity(&self) -> Cow<'_, str>;

    /// Non-negative distance to `other`.
    fn distance_to(&self, other: &Self) -> f64;
}

/// A named coordinate vector measured with Euclidean distance.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPoint {
    name: String,
    coords: Vec<f64>,
}

impl NamedPoint {
    /// Create a point from a name and its coordinates.
    pub fn new(name: impl Into<String>, coords: impl Into<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            coords: coords.into(),
        }
    }

    /// The point's name, used as its identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The point's coordinates.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }
}

impl Point for NamedPoint {
    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    #[inline]
    fn distance_to(&self, other: &Self) -> f64 {
        debug_assert_eq!(self.coords.len(), other.coords.len());
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}
