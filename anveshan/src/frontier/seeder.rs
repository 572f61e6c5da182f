//! Angular/radial sampling of frontier waypoints.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::math::{ease_in_cubic, rotating_phase, TWO_PI};
use crate::core::{AreaId, CellKey, WorldPoint};
use crate::world::{OcclusionMask, SearchWorld};

use super::Frontier;

/// Fewest angles tried by a cross-area seed
const MIN_ACROSS_ANGLES: usize = 12;

/// Distance parameters shared by both seeding modes.
#[derive(Clone, Copy, Debug)]
pub struct SeedParams {
    /// Minimum hop distance of the planner
    pub min_hop: f32,
    /// Current search radius (base plus boost)
    pub max_step: f32,
    /// Accept portal cells as cross-area targets
    pub allow_portals: bool,
    /// Drop points not visible from the anchor
    pub use_line_of_sight: bool,
    pub mask: OcclusionMask,
}

impl SeedParams {
    /// Sampling ring `[r_min, r_max]`, `None` when it is not finite.
    fn ring(&self, pad: f32, reach: f32) -> Option<(f32, f32)> {
        let r_min = (1.5 * self.min_hop).max(2.0);
        let r_max = (r_min + pad).max(reach * self.max_step);
        (r_min.is_finite() && r_max.is_finite()).then_some((r_min, r_max))
    }
}

/// Frontier sampler with its own random stream and dedup working set.
#[derive(Debug)]
pub struct FrontierSeeder {
    rng: StdRng,
    seen: Vec<CellKey>,
}

impl FrontierSeeder {
    /// Seeder whose dedup set holds a cross-area batch of `batch_size`.
    pub fn new(seed: u64, batch_size: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seen: Vec::with_capacity((2 * batch_size).max(MIN_ACROSS_ANGLES)),
        }
    }

    /// Refill `frontier` with up to `count` points spread around `anchor`.
    ///
    /// Angles are evenly spaced from a base that rotates with `now`, radii
    /// are biased toward the near edge of the ring. Points snap to walkable
    /// nodes. Returns the number of points added.
    pub fn seed_around(
        &mut self,
        frontier: &mut Frontier,
        world: &SearchWorld<'_>,
        anchor: WorldPoint,
        count: usize,
        params: &SeedParams,
        now: f32,
    ) -> usize {
        if count == 0 {
            return 0;
        }
        let Ok(world) = world.resolve() else {
            return 0;
        };
        let Some((r_min, r_max)) = params.ring(3.0, 1.2) else {
            return 0;
        };
        frontier.clear();
        self.seen.clear();

        let base = rotating_phase(now);
        let step = TWO_PI / count as f32;
        let layout = world.grid.layout();

        let mut added = 0;
        for i in 0..count {
            let angle = base + i as f32 * step;
            let u: f32 = self.rng.random();
            let radius = r_min + (r_max - r_min) * ease_in_cubic(u);

            let Some(node) = world.grid.nearest_node(anchor.point_at(angle, radius)) else {
                continue;
            };
            let point = world.grid.node_position(node);
            if params.use_line_of_sight && !world.line_of_sight(anchor, point, params.mask) {
                continue;
            }
            let Some(key) = layout.key(node) else {
                continue;
            };
            if self.seen.contains(&key) {
                continue;
            }
            self.seen.push(key);
            frontier.push(point);
            added += 1;
        }
        added
    }

    /// Refill `frontier` with up to `count` walkable points outside
    /// `from_area`, sampled on a near and a far ring around `around`.
    pub fn seed_across(
        &mut self,
        frontier: &mut Frontier,
        world: &SearchWorld<'_>,
        from_area: AreaId,
        around: WorldPoint,
        count: usize,
        params: &SeedParams,
    ) -> usize {
        if count == 0 {
            return 0;
        }
        let Ok(world) = world.resolve() else {
            return 0;
        };
        let Some((r_min, r_max)) = params.ring(5.0, 1.5) else {
            return 0;
        };
        frontier.clear();
        self.seen.clear();

        let r_mid = 0.5 * (r_min + r_max);
        let angles = MIN_ACROSS_ANGLES.max(2 * count);
        let step = TWO_PI / angles as f32;
        let base = self.rng.random::<f32>() * TWO_PI;
        let layout = world.grid.layout();

        let mut added = 0;
        'angles: for i in 0..angles {
            let angle = base + i as f32 * step;
            let radii = [
                self.rng.random_range(r_min..r_mid),
                self.rng.random_range(r_mid..r_max),
            ];
            for radius in radii {
                let Some(node) = world.grid.nearest_node(around.point_at(angle, radius)) else {
                    continue;
                };
                if !world.grid.is_walkable(node) {
                    continue;
                }
                let acceptable = match world.areas.strict_area_at(node) {
                    Some(area) => area != from_area,
                    None => params.allow_portals && world.areas.is_portal(node),
                };
                if !acceptable {
                    continue;
                }
                let Some(key) = layout.key(node) else {
                    continue;
                };
                if self.seen.contains(&key) {
                    continue;
                }
                self.seen.push(key);
                frontier.push(world.grid.node_position(node));
                added += 1;
                if added >= count {
                    break 'angles;
                }
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::GridMap;
    use crate::world::AreaPartition;

    fn params(min_hop: f32, max_step: f32) -> SeedParams {
        SeedParams {
            min_hop,
            max_step,
            allow_portals: false,
            use_line_of_sight: false,
            mask: OcclusionMask::WALLS,
        }
    }

    fn unique(points: &[WorldPoint]) -> bool {
        points
            .iter()
            .enumerate()
            .all(|(i, a)| points[i + 1..].iter().all(|b| a != b))
    }

    #[test]
    fn test_seed_around_open_map() {
        let map = GridMap::open(30, 30, 1.0);
        let mut seeder = FrontierSeeder::new(7, 16);
        let mut frontier = Frontier::new();
        let anchor = map.center(15, 15);

        let added = seeder.seed_around(&mut frontier, &map.world(), anchor, 8, &params(2.0, 6.0), 1.0);
        assert!(added > 0 && added <= 8);
        assert_eq!(frontier.remaining(), added);
        assert!(unique(frontier.pending()));

        // Everything lies in the ring, allowing half a cell of snapping
        for p in frontier.pending() {
            let d = p.distance(&anchor);
            assert!(d >= 3.0 - 0.75 && d <= 7.2 + 0.75, "distance {d}");
        }
    }

    #[test]
    fn test_seed_around_replaces_previous_batch() {
        let map = GridMap::open(30, 30, 1.0);
        let mut seeder = FrontierSeeder::new(1, 16);
        let mut frontier = Frontier::new();
        frontier.push(WorldPoint::new(-100.0, -100.0));

        seeder.seed_around(&mut frontier, &map.world(), map.center(15, 15), 6, &params(2.0, 6.0), 0.0);
        assert!(!frontier.pending().contains(&WorldPoint::new(-100.0, -100.0)));
    }

    #[test]
    fn test_seed_around_dedups_on_tiny_map() {
        let map = GridMap::open(3, 3, 1.0);
        let mut seeder = FrontierSeeder::new(2, 16);
        let mut frontier = Frontier::new();

        let added = seeder.seed_around(&mut frontier, &map.world(), map.center(1, 1), 32, &params(2.0, 6.0), 0.0);
        assert!(added <= 9);
        assert!(unique(frontier.pending()));
    }

    #[test]
    fn test_seed_around_line_of_sight() {
        let map = GridMap::from_ascii(
            &[
                "0000000000",
                "0000000000",
                "##########",
                "1111111111",
                "1111111111",
            ],
            1.0,
        )
        .unwrap();
        let mut seeder = FrontierSeeder::new(3, 16);
        let mut frontier = Frontier::new();
        let anchor = map.center(5, 0);
        let mut p = params(1.0, 3.0);
        p.use_line_of_sight = true;

        seeder.seed_around(&mut frontier, &map.world(), anchor, 16, &p, 0.0);
        for point in frontier.pending() {
            assert!(point.y < 2.0, "seeded behind the wall at {point:?}");
        }
    }

    #[test]
    fn test_seed_across_leaves_area() {
        let map = GridMap::split_vertical(20, 10, 10, 1.0);
        let mut seeder = FrontierSeeder::new(11, 16);
        let mut frontier = Frontier::new();
        let around = map.center(8, 5);

        let added = seeder.seed_across(&mut frontier, &map.world(), AreaId(0), around, 5, &params(2.0, 6.0));
        assert!(added > 0 && added <= 5);
        assert!(unique(frontier.pending()));
        for p in frontier.pending() {
            assert_eq!(map.strict_area(*p), Some(AreaId(1)));
        }
    }

    #[test]
    fn test_seed_across_portals_only_when_allowed() {
        let map = GridMap::from_ascii(&["000+"], 1.0).unwrap();
        let mut seeder = FrontierSeeder::new(5, 16);
        let mut frontier = Frontier::new();
        let around = map.center(0, 0);

        let added = seeder.seed_across(&mut frontier, &map.world(), AreaId(0), around, 3, &params(1.0, 2.0));
        assert_eq!(added, 0);

        let mut p = params(1.0, 2.0);
        p.allow_portals = true;
        let added = seeder.seed_across(&mut frontier, &map.world(), AreaId(0), around, 3, &p);
        assert_eq!(added, 1);
        assert_eq!(frontier.pop_next(), Some(map.center(3, 0)));
    }

    #[test]
    fn test_zero_count_and_degraded_world() {
        let map = GridMap::open(10, 10, 1.0);
        let mut seeder = FrontierSeeder::new(0, 16);
        let mut frontier = Frontier::new();
        frontier.push(WorldPoint::new(1.0, 1.0));

        assert_eq!(seeder.seed_around(&mut frontier, &map.world(), map.center(5, 5), 0, &params(2.0, 6.0), 0.0), 0);
        assert_eq!(frontier.remaining(), 1);

        let degraded = SearchWorld::default();
        assert_eq!(seeder.seed_across(&mut frontier, &degraded, AreaId(0), map.center(5, 5), 4, &params(2.0, 6.0)), 0);
    }

    #[test]
    fn test_dedup_set_sized_from_batch() {
        let map = GridMap::split_vertical(60, 60, 30, 1.0);
        let mut seeder = FrontierSeeder::new(8, 40);
        let capacity = seeder.seen.capacity();
        assert!(capacity >= 80);

        let mut frontier = Frontier::new();
        let around = map.center(28, 30);
        seeder.seed_across(&mut frontier, &map.world(), AreaId(0), around, 40, &params(2.0, 20.0));
        seeder.seed_around(&mut frontier, &map.world(), around, 40, &params(2.0, 20.0), 0.0);
        assert_eq!(seeder.seen.capacity(), capacity);
    }

    #[test]
    fn test_non_finite_ring_refuses_seeding() {
        let map = GridMap::split_vertical(20, 10, 10, 1.0);
        let mut seeder = FrontierSeeder::new(4, 8);
        let mut frontier = Frontier::new();
        frontier.push(WorldPoint::new(1.0, 1.0));
        let around = map.center(8, 5);

        let p = params(2.0, f32::INFINITY);
        assert_eq!(seeder.seed_across(&mut frontier, &map.world(), AreaId(0), around, 4, &p), 0);
        assert_eq!(seeder.seed_around(&mut frontier, &map.world(), around, 4, &p, 0.0), 0);
        assert_eq!(frontier.remaining(), 1);
    }
}
