//! Water-filling distribution of free space and overflow among siblings.
//!
//! Growing raises the children with the lowest `size / weight` ratio
//! together until they catch up with the next child or hit their maximum,
//! so the final sizes are the exact weighted fill. Shrinking lowers the
//! largest children together until they reach the next largest or their own
//! minimum. Both run in a bounded number of rounds: every round either
//! spends the whole budget, retires a child, or merges another child into
//! the moving set.

use smallvec::SmallVec;

/// A child taking part in growth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowItem {
    pub size: f32,
    pub weight: f32,
    pub max: f32,
}

/// A child taking part in shrinking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShrinkItem {
    pub size: f32,
    pub min: f32,
}

type Active = SmallVec<[usize; 8]>;

/// Hand out `space` among `items` by weight. Returns the space left over
/// because every item reached its maximum.
pub fn grow(items: &mut [GrowItem], space: f32, epsilon: f32) -> f32 {
    let mut remaining = space;
    let mut active: Active = (0..items.len())
        .filter(|&i| items[i].weight > 0.0 && items[i].size < items[i].max - epsilon)
        .collect();
    let limit = 2 * items.len() + 2;
    let mut rounds = 0;

    while remaining > epsilon && !active.is_empty() && rounds < limit {
        rounds += 1;
        let ratio = |item: &GrowItem| item.size / item.weight;

        let lowest = active
            .iter()
            .map(|&i| ratio(&items[i]))
            .fold(f32::INFINITY, f32::min);
        let (level, rest): (Active, Active) = active
            .iter()
            .copied()
            .partition(|&i| (ratio(&items[i]) - lowest) * items[i].weight <= epsilon);

        let next = rest
            .iter()
            .map(|&i| ratio(&items[i]))
            .fold(f32::INFINITY, f32::min);
        let cap = level
            .iter()
            .map(|&i| items[i].max / items[i].weight)
            .fold(f32::INFINITY, f32::min);
        let weight: f32 = level.iter().map(|&i| items[i].weight).sum();
        let target = next.min(cap).min(lowest + remaining / weight);

        for &i in &level {
            let item = &mut items[i];
            let size = (target * item.weight).min(item.max).max(item.size);
            remaining -= size - item.size;
            item.size = size;
        }

        active.retain(|i| items[*i].size < items[*i].max - epsilon);
    }

    remaining.max(0.0)
}

/// Take `overflow` away from `items`, largest first. Returns the overflow
/// that could not be absorbed because every item reached its minimum.
pub fn shrink(items: &mut [ShrinkItem], overflow: f32, epsilon: f32) -> f32 {
    let mut remaining = overflow;
    let mut active: Active = (0..items.len())
        .filter(|&i| items[i].size > items[i].min + epsilon)
        .collect();
    let limit = 2 * items.len() + 2;
    let mut rounds = 0;

    while remaining > epsilon && !active.is_empty() && rounds < limit {
        rounds += 1;

        let largest = active
            .iter()
            .map(|&i| items[i].size)
            .fold(f32::NEG_INFINITY, f32::max);
        let (level, rest): (Active, Active) = active
            .iter()
            .copied()
            .partition(|&i| items[i].size >= largest - epsilon);

        let next = rest
            .iter()
            .map(|&i| items[i].size)
            .fold(f32::NEG_INFINITY, f32::max);
        let floor = level
            .iter()
            .map(|&i| items[i].min)
            .fold(f32::NEG_INFINITY, f32::max);
        let target = (largest - remaining / level.len() as f32).max(next).max(floor);

        for &i in &level {
            let item = &mut items[i];
            let size = target.max(item.min).min(item.size);
            remaining -= item.size - size;
            item.size = size;
        }

        active.retain(|i| items[*i].size > items[*i].min + epsilon);
    }

    remaining.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 0.001;

    fn grow_items(specs: &[(f32, f32, f32)]) -> Vec<GrowItem> {
        specs
            .iter()
            .map(|&(size, weight, max)| GrowItem { size, weight, max })
            .collect()
    }

    #[test]
    fn test_grow_by_weight() {
        let mut items = grow_items(&[(0.0, 1.0, f32::INFINITY), (0.0, 2.0, f32::INFINITY)]);
        let left = grow(&mut items, 300.0, EPS);
        assert!(left.abs() < 0.01);
        assert!((items[0].size - 100.0).abs() < 0.01);
        assert!((items[1].size - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_grow_levels_smallest_first() {
        let mut items = grow_items(&[(50.0, 1.0, f32::INFINITY), (0.0, 1.0, f32::INFINITY)]);
        grow(&mut items, 30.0, EPS);
        assert!((items[0].size - 50.0).abs() < 0.01);
        assert!((items[1].size - 30.0).abs() < 0.01);

        grow(&mut items, 40.0, EPS);
        assert!((items[0].size - 60.0).abs() < 0.01);
        assert!((items[1].size - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_grow_respects_max() {
        let mut items = grow_items(&[(0.0, 1.0, 40.0), (0.0, 1.0, f32::INFINITY)]);
        grow(&mut items, 200.0, EPS);
        assert!((items[0].size - 40.0).abs() < 0.01);
        assert!((items[1].size - 160.0).abs() < 0.01);

        let mut capped = grow_items(&[(0.0, 1.0, 10.0), (0.0, 3.0, 20.0)]);
        let left = grow(&mut capped, 100.0, EPS);
        assert!((left - 70.0).abs() < 0.01);
    }

    #[test]
    fn test_shrink_largest_first() {
        let mut items = vec![
            ShrinkItem { size: 100.0, min: 0.0 },
            ShrinkItem { size: 60.0, min: 0.0 },
        ];
        shrink(&mut items, 30.0, EPS);
        assert!((items[0].size - 70.0).abs() < 0.01);
        assert!((items[1].size - 60.0).abs() < 0.01);

        shrink(&mut items, 30.0, EPS);
        assert!((items[0].size - 50.0).abs() < 0.01);
        assert!((items[1].size - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_shrink_stops_at_min() {
        let mut items = vec![
            ShrinkItem { size: 100.0, min: 80.0 },
            ShrinkItem { size: 100.0, min: 0.0 },
        ];
        let left = shrink(&mut items, 60.0, EPS);
        assert!(left.abs() < 0.01);
        assert!((items[0].size - 80.0).abs() < 0.01);
        assert!((items[1].size - 60.0).abs() < 0.01);

        let left = shrink(&mut items, 200.0, EPS);
        assert!((left - 140.0).abs() < 0.01);
        assert!((items[1].size - 0.0).abs() < 0.01);
    }

    proptest! {
        #[test]
        fn grow_conserves_space(
            specs in prop::collection::vec((0.0f32..200.0, 0.1f32..5.0), 1..8),
            space in 0.0f32..1000.0,
        ) {
            let mut items: Vec<GrowItem> = specs
                .iter()
                .map(|&(size, weight)| GrowItem { size, weight, max: f32::INFINITY })
                .collect();
            let before: f32 = items.iter().map(|i| i.size).sum();
            let left = grow(&mut items, space, EPS);
            let after: f32 = items.iter().map(|i| i.size).sum();
            prop_assert!(left.abs() < 0.05);
            prop_assert!((after - before - space).abs() < 0.05 * items.len() as f32);
        }

        #[test]
        fn grow_never_shrinks_or_exceeds_max(
            specs in prop::collection::vec((0.0f32..100.0, 0.1f32..5.0, 0.0f32..300.0), 1..8),
            space in 0.0f32..1000.0,
        ) {
            let mut items: Vec<GrowItem> = specs
                .iter()
                .map(|&(size, weight, extra)| GrowItem { size, weight, max: size + extra })
                .collect();
            let original = items.clone();
            grow(&mut items, space, EPS);
            for (item, before) in items.iter().zip(&original) {
                prop_assert!(item.size >= before.size - EPS);
                prop_assert!(item.size <= before.max + EPS);
            }
        }

        #[test]
        fn shrink_respects_min(
            specs in prop::collection::vec((0.0f32..100.0, 0.0f32..200.0), 1..8),
            overflow in 0.0f32..1000.0,
        ) {
            let mut items: Vec<ShrinkItem> = specs
                .iter()
                .map(|&(min, extra)| ShrinkItem { size: min + extra, min })
                .collect();
            let before: f32 = items.iter().map(|i| i.size).sum();
            let slack: f32 = items.iter().map(|i| i.size - i.min).sum();
            let left = shrink(&mut items, overflow, EPS);
            let after: f32 = items.iter().map(|i| i.size).sum();
            for item in &items {
                prop_assert!(item.size >= item.min - EPS);
            }
            let absorbed = overflow.min(slack);
            prop_assert!((before - after - absorbed).abs() < 0.05 * items.len() as f32);
            prop_assert!((left - (overflow - absorbed)).abs() < 0.05 * items.len() as f32);
        }
    }
}
