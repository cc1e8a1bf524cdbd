use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Circle;

/// Discovery-ordered circles with no two members near-duplicates of each other.
///
/// Membership is also kept in a hash index, so admitting a candidate probes its
/// fifteen neighbor triples instead of scanning every accepted circle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Circle>", into = "Vec<Circle>")]
pub struct CircleSet {
    circles: Vec<Circle>,
    index: HashSet<Circle>,
}

impl CircleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Does `candidate` collide with anything already accepted?
    pub fn has_near_duplicate(&self, candidate: &Circle) -> bool {
        candidate.neighbors().any(|n| self.index.contains(&n))
    }

    /// Append `candidate` unless it collides. Returns whether it was admitted.
    pub fn try_insert(&mut self, candidate: Circle) -> bool {
        if self.has_near_duplicate(&candidate) {
            return false;
        }
        self.index.insert(candidate);
        self.circles.push(candidate);
        true
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn as_slice(&self) -> &[Circle] {
        &self.circles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Circle> {
        self.circles.iter()
    }

    /// Smallest and largest accepted radius.
    pub fn radius_bounds(&self) -> Option<(i32, i32)> {
        let min = self.circles.iter().map(|c| c.r).min()?;
        let max = self.circles.iter().map(|c| c.r).max()?;
        Some((min, max))
    }

    pub fn into_vec(self) -> Vec<Circle> {
        self.circles
    }
}

impl From<Vec<Circle>> for CircleSet {
    fn from(circles: Vec<Circle>) -> Self {
        circles.into_iter().collect()
    }
}

impl From<CircleSet> for Vec<Circle> {
    fn from(set: CircleSet) -> Self {
        set.circles
    }
}

/// Collecting offers every item to the filter in iteration order.
impl FromIterator<Circle> for CircleSet {
    fn from_iter<T: IntoIterator<Item = Circle>>(iter: T) -> Self {
        let mut set = Self::new();
        for circle in iter {
            set.try_insert(circle);
        }
        set
    }
}

impl IntoIterator for CircleSet {
    type Item = Circle;
    type IntoIter = std::vec::IntoIter<Circle>;

    fn into_iter(self) -> Self::IntoIter {
        self.circles.into_iter()
    }
}

impl<'a> IntoIterator for &'a CircleSet {
    type Item = &'a Circle;
    type IntoIter = std::slice::Iter<'a, Circle>;

    fn into_iter(self) -> Self::IntoIter {
        self.circles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference behavior: compare against every accepted circle.
    fn linear_admit(accepted: &mut Vec<Circle>, candidate: Circle) -> bool {
        if accepted.iter().any(|c| candidate.is_near_duplicate(c)) {
            return false;
        }
        accepted.push(candidate);
        true
    }

    #[test]
    fn test_adjacent_candidate_rejected() {
        let mut set = CircleSet::new();
        assert!(set.try_insert(Circle::new(10, 10, 5)));
        assert!(!set.try_insert(Circle::new(11, 10, 5)));
        assert!(set.try_insert(Circle::new(13, 10, 5)));
        assert_eq!(
            set.as_slice(),
            &[Circle::new(10, 10, 5), Circle::new(13, 10, 5)]
        );
    }

    #[test]
    fn test_reoffering_members_is_rejected() {
        let mut set: CircleSet = vec![
            Circle::new(10, 10, 5),
            Circle::new(40, 12, 7),
            Circle::new(12, 40, 9),
        ]
        .into();
        let members = set.as_slice().to_vec();
        for circle in members {
            assert!(!set.try_insert(circle));
        }
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_non_transitive_chain() {
        // (11,10,5) collides with the first circle and is dropped, so (12,10,5)
        // only has the first circle to compare against and is admitted.
        let set: CircleSet = vec![
            Circle::new(10, 10, 5),
            Circle::new(11, 10, 5),
            Circle::new(12, 10, 5),
        ]
        .into();
        assert_eq!(
            set.as_slice(),
            &[Circle::new(10, 10, 5), Circle::new(12, 10, 5)]
        );
    }

    #[test]
    fn test_index_matches_linear_scan() {
        let mut set = CircleSet::new();
        let mut reference = Vec::new();
        for r in 4..7 {
            for x in 0..6 {
                for y in 0..6 {
                    let c = Circle::new(x, y, r);
                    assert_eq!(set.try_insert(c), linear_admit(&mut reference, c));
                }
            }
        }
        assert_eq!(set.as_slice(), reference.as_slice());
    }

    #[test]
    fn test_radius_bounds() {
        assert_eq!(CircleSet::new().radius_bounds(), None);
        let set: CircleSet = vec![Circle::new(0, 0, 30), Circle::new(50, 50, 26)].into();
        assert_eq!(set.radius_bounds(), Some((26, 30)));
    }
}
