//! Preloaded route replayed through a cursor.

use std::iter::FusedIterator;

use crate::position::Position;

/// A finite, preloaded list of positions handed out one at a time.
///
/// Every file loader produces one of these. Indices are renumbered 1..=N in
/// load order, whatever the source file said.
#[derive(Debug, Clone)]
pub struct RouteGenerator {
    source: &'static str,
    positions: Vec<Position>,
    cursor: usize,
}

impl RouteGenerator {
    /// Wrap `positions` for replay, renumbering their indices from 1.
    pub fn new(source: &'static str, mut positions: Vec<Position>) -> Self {
        for (i, position) in positions.iter_mut().enumerate() {
            position.index = i as u64 + 1;
        }
        Self {
            source,
            positions,
            cursor: 0,
        }
    }

    /// Name of the loader that filled this route.
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Total number of loaded positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions not yet handed out.
    pub fn remaining(&self) -> usize {
        self.positions.len().saturating_sub(self.cursor)
    }

    /// All loaded positions, including those already replayed.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }
}

impl Iterator for RouteGenerator {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let position = self.positions.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RouteGenerator {}

impl FusedIterator for RouteGenerator {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn positions(count: usize) -> Vec<Position> {
        (0..count)
            .map(|i| Position::new(99, i as f64, -(i as f64), 5.0, 10.0, Utc::now()))
            .collect()
    }

    #[test]
    fn test_renumbers_indices() {
        let route = RouteGenerator::new("csv", positions(3));
        let indices: Vec<u64> = route.positions().iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_exhaustion_is_permanent() {
        let mut route = RouteGenerator::new("geojson", positions(3));
        assert_eq!(route.len(), 3);

        for expected in 1..=3 {
            assert_eq!(route.next().map(|p| p.index), Some(expected));
        }
        for _ in 0..5 {
            assert!(route.next().is_none());
        }
        assert_eq!(route.remaining(), 0);
    }

    #[test]
    fn test_replays_in_order() {
        let route = RouteGenerator::new("csv", positions(4));
        let lats: Vec<f64> = route.map(|p| p.lat).collect();
        assert_eq!(lats, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_empty_route_is_immediately_exhausted() {
        let mut route = RouteGenerator::new("nmea", Vec::new());
        assert!(route.is_empty());
        assert_eq!(route.size_hint(), (0, Some(0)));
        assert!(route.next().is_none());
    }
}
