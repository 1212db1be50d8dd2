use std::borrow::Cow;
use std::collections::HashMap;

use super::point::Point;
use crate::error::Result;

/// Common interface for hard clustering over borrowed points.
pub trait Clustering<P: Point> {
    /// Group `points` into clusters, in discovery order.
    ///
    /// Each cluster borrows its members from `points`. Points left out of
    /// every cluster are noise.
    fn cluster<'a>(&self, points: &'a [P]) -> Result<Vec<Vec<&'a P>>>;

    /// One label per input point: `Some(k)` for a member of cluster `k`,
    /// `None` for noise.
    fn labels(&self, points: &[P]) -> Result<Vec<Option<usize>>> {
        let clusters = self.cluster(points)?;

        let mut index: HashMap<Cow<'_, str>, usize> = HashMap::with_capacity(points.len());
        for (label, members) in clusters.iter().enumerate() {
            for member in members {
                index.insert(member.identity(), label);
            }
        }

        Ok(points
            .iter()
            .map(|p| index.get(p.identity().as_ref()).copied())
            .collect())
    }
}
