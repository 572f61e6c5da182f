//! Budgeted candidate enumeration and scoring.
//!
//! Candidates lie on a golden-angle spiral around the agent with random
//! radii in `[min_hop, radius]`. Each passes area, recency, visibility and
//! hop filters before being scored:
//!
//! ```text
//! score = hop_weight       * clamp((d - min_hop) / radius, 0, 1)
//!       - overshoot_weight * max(0, d - radius) / radius
//!       + direction_weight * (cos(travel, candidate) + 1) / 2
//!       - recency_weight   * proximity(recent targets, 1.5 * separation)
//! ```

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::ScoringSection;
use crate::core::math::{GOLDEN_ANGLE, TWO_PI};
use crate::core::{AreaId, WorldPoint};
use crate::world::{OcclusionMask, World};

use super::recency::{RecencyRing, RECENT_TARGETS};

/// Budget used when the configured one is not representable
const MAX_BUDGET: Duration = Duration::from_secs(1);

/// Which areas a candidate may land in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaFilter {
    /// Only this area
    Within(AreaId),
    /// Any area except `current` and avoided ones
    Elsewhere { current: Option<AreaId> },
}

/// Inputs of one scoring pass.
pub struct CandidateQuery<'q> {
    pub origin: WorldPoint,
    pub radius: f32,
    pub min_hop: f32,
    /// Unit travel direction, zero when unknown
    pub travel_dir: WorldPoint,
    pub filter: AreaFilter,
    /// Line-of-sight gate from `origin`, if enabled
    pub sight: Option<OcclusionMask>,
    pub recent: &'q RecencyRing<RECENT_TARGETS>,
    pub avoided: &'q dyn Fn(AreaId) -> bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredCandidate {
    pub point: WorldPoint,
    pub score: f32,
    /// Drawn from the partition because no candidate qualified
    pub sampled: bool,
}

/// Candidate scorer with weights and a wall-clock budget.
#[derive(Clone, Debug)]
pub struct CandidateScorer {
    weights: ScoringSection,
    hard_min_separation: f32,
    budget: Duration,
    samples: Vec<WorldPoint>,
}

impl CandidateScorer {
    pub fn new(weights: &ScoringSection, hard_min_separation: f32) -> Self {
        Self {
            weights: weights.clone(),
            hard_min_separation,
            budget: Duration::try_from_secs_f32(weights.budget_ms.max(0.0) / 1000.0)
                .unwrap_or(MAX_BUDGET),
            samples: Vec::with_capacity(4),
        }
    }

    /// Score a candidate that already passed every filter.
    pub fn score(&self, query: &CandidateQuery<'_>, point: WorldPoint) -> f32 {
        let w = &self.weights;
        let offset = point - query.origin;
        let d = offset.length();
        let radius = query.radius.max(1e-3);

        let hop = w.hop_weight * ((d - query.min_hop) / radius).clamp(0.0, 1.0);
        let overshoot = w.overshoot_weight * (d - radius).max(0.0) / radius;
        let direction = if query.travel_dir.length() > 0.0 && d > 0.0 {
            let cos = query.travel_dir.dot(&offset.normalize()).clamp(-1.0, 1.0);
            w.direction_weight * (cos + 1.0) * 0.5
        } else {
            w.direction_weight * 0.5
        };
        let recency =
            w.recency_weight * query.recent.proximity(point, 1.5 * self.hard_min_separation);

        hop - overshoot + direction - recency
    }

    /// Enumerate candidates until the count or the time budget runs out and
    /// return the best one.
    ///
    /// With an area-restricted filter and no qualifying candidate, a random
    /// point of that area is returned instead (flagged `sampled`).
    pub fn best(
        &mut self,
        world: &World<'_>,
        rng: &mut StdRng,
        query: &CandidateQuery<'_>,
    ) -> Option<ScoredCandidate> {
        let started = Instant::now();
        let base = rng.random::<f32>() * TWO_PI;
        let hop = query.min_hop.max(0.0);
        let mut best: Option<ScoredCandidate> = None;

        for i in 0..self.weights.max_candidates {
            if i > 0 && started.elapsed() > self.budget {
                break;
            }
            let angle = base + i as f32 * GOLDEN_ANGLE;
            let r = if query.radius > hop && query.radius.is_finite() {
                rng.random_range(hop..=query.radius)
            } else {
                hop
            };

            let Some(point) = self.qualify(world, query, query.origin.point_at(angle, r)) else {
                continue;
            };
            let score = self.score(query, point);
            if best.map_or(true, |b| score > b.score) {
                best = Some(ScoredCandidate {
                    point,
                    score,
                    sampled: false,
                });
            }
        }

        if best.is_some() {
            return best;
        }
        let AreaFilter::Within(area) = query.filter else {
            return None;
        };
        self.samples.clear();
        world.areas.sample_points(area, 1, rng, &mut self.samples);
        self.samples.first().map(|&point| ScoredCandidate {
            point,
            score: f32::NEG_INFINITY,
            sampled: true,
        })
    }

    /// Snap a raw candidate to the grid and run every filter.
    fn qualify(
        &self,
        world: &World<'_>,
        query: &CandidateQuery<'_>,
        raw: WorldPoint,
    ) -> Option<WorldPoint> {
        let node = world.grid.nearest_node(raw)?;
        if world.areas.is_portal(node) {
            return None;
        }
        let area = world.areas.strict_area_at(node)?;
        let allowed = match query.filter {
            AreaFilter::Within(a) => area == a,
            AreaFilter::Elsewhere { current } => Some(area) != current && !(query.avoided)(area),
        };
        if !allowed {
            return None;
        }

        let point = world.grid.node_position(node);
        if query.origin.distance(&point) < query.min_hop {
            return None;
        }
        if let Some(d) = query.recent.nearest_distance(point) {
            if d < self.hard_min_separation {
                return None;
            }
        }
        if let Some(mask) = query.sight {
            if !world.line_of_sight(query.origin, point, mask) {
                return None;
            }
        }
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::GridMap;
    use crate::world::AreaPartition;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn never(_: AreaId) -> bool {
        false
    }

    fn query<'q>(
        origin: WorldPoint,
        filter: AreaFilter,
        recent: &'q RecencyRing<RECENT_TARGETS>,
        avoided: &'q dyn Fn(AreaId) -> bool,
    ) -> CandidateQuery<'q> {
        CandidateQuery {
            origin,
            radius: 6.0,
            min_hop: 2.0,
            travel_dir: WorldPoint::ZERO,
            filter,
            sight: None,
            recent,
            avoided,
        }
    }

    #[test]
    fn test_score_terms() {
        let scorer = CandidateScorer::new(&ScoringSection::default(), 1.5);
        let recent = RecencyRing::new();
        let mut q = query(WorldPoint::ZERO, AreaFilter::Within(AreaId(0)), &recent, &never);

        // Neutral direction term without travel direction
        let at_hop = scorer.score(&q, WorldPoint::new(2.0, 0.0));
        assert_relative_eq!(at_hop, 0.35 * 0.5);

        // Full hop term at d = min_hop + radius, overshoot beyond radius
        let far = scorer.score(&q, WorldPoint::new(8.0, 0.0));
        assert_relative_eq!(far, 0.25 - 0.2 * (2.0 / 6.0) + 0.35 * 0.5, epsilon = 1e-5);

        q.travel_dir = WorldPoint::UNIT_X;
        let ahead = scorer.score(&q, WorldPoint::new(4.0, 0.0));
        let behind = scorer.score(&q, WorldPoint::new(-4.0, 0.0));
        assert!(ahead > behind);
        assert_relative_eq!(ahead - behind, 0.35, epsilon = 1e-5);
    }

    #[test]
    fn test_recency_penalty() {
        let scorer = CandidateScorer::new(&ScoringSection::default(), 2.0);
        let mut recent = RecencyRing::new();
        let q_empty = query(WorldPoint::ZERO, AreaFilter::Within(AreaId(0)), &recent, &never);
        let clean = scorer.score(&q_empty, WorldPoint::new(4.0, 0.0));

        recent.push(WorldPoint::new(5.0, 0.0));
        let q = query(WorldPoint::ZERO, AreaFilter::Within(AreaId(0)), &recent, &never);
        let penalized = scorer.score(&q, WorldPoint::new(4.0, 0.0));
        // proximity = 1 - 1 / 3
        assert_relative_eq!(clean - penalized, 0.6 * (2.0 / 3.0), epsilon = 1e-5);
    }

    #[test]
    fn test_best_respects_filters() {
        let map = GridMap::split_vertical(30, 30, 15, 1.0);
        let world = map.world().resolve().unwrap();
        let mut scorer = CandidateScorer::new(&ScoringSection::default(), 1.5);
        let mut rng = StdRng::seed_from_u64(4);
        let recent = RecencyRing::new();
        let origin = map.center(10, 15);

        let q = query(origin, AreaFilter::Within(AreaId(0)), &recent, &never);
        for _ in 0..10 {
            let best = scorer.best(&world, &mut rng, &q).unwrap();
            assert!(!best.sampled);
            assert_eq!(map.strict_area(best.point), Some(AreaId(0)));
            assert!(best.point.distance(&origin) >= 2.0);
        }

        let q = query(origin, AreaFilter::Elsewhere { current: Some(AreaId(0)) }, &recent, &never);
        if let Some(best) = scorer.best(&world, &mut rng, &q) {
            assert_eq!(map.strict_area(best.point), Some(AreaId(1)));
        }
    }

    #[test]
    fn test_avoided_areas_excluded() {
        let map = GridMap::split_vertical(30, 30, 15, 1.0);
        let world = map.world().resolve().unwrap();
        let mut scorer = CandidateScorer::new(&ScoringSection::default(), 1.5);
        let mut rng = StdRng::seed_from_u64(9);
        let recent = RecencyRing::new();
        let avoid_one = |a: AreaId| a == AreaId(1);

        let q = query(
            map.center(14, 15),
            AreaFilter::Elsewhere { current: Some(AreaId(0)) },
            &recent,
            &avoid_one,
        );
        assert!(scorer.best(&world, &mut rng, &q).is_none());
    }

    #[test]
    fn test_non_finite_settings_do_not_panic() {
        let weights = ScoringSection {
            budget_ms: f32::INFINITY,
            ..ScoringSection::default()
        };
        let mut scorer = CandidateScorer::new(&weights, 1.5);
        assert_eq!(scorer.budget, MAX_BUDGET);

        let map = GridMap::open(10, 10, 1.0);
        let world = map.world().resolve().unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let recent = RecencyRing::new();
        let mut q = query(map.center(5, 5), AreaFilter::Within(AreaId(0)), &recent, &never);
        q.radius = f32::INFINITY;

        // Every candidate sits at the hop distance
        let best = scorer.best(&world, &mut rng, &q).unwrap();
        assert_eq!(map.strict_area(best.point), Some(AreaId(0)));
    }

    #[test]
    fn test_falls_back_to_area_sample() {
        // No cell of a 3x3 room is a full hop away from its center
        let map = GridMap::open(3, 3, 1.0);
        let world = map.world().resolve().unwrap();
        let mut scorer = CandidateScorer::new(&ScoringSection::default(), 1.5);
        let mut rng = StdRng::seed_from_u64(1);
        let recent = RecencyRing::new();

        let mut q = query(map.center(1, 1), AreaFilter::Within(AreaId(0)), &recent, &never);
        q.min_hop = 5.0;
        q.radius = 6.0;
        let best = scorer.best(&world, &mut rng, &q).unwrap();
        assert!(best.sampled);
        assert_eq!(map.strict_area(best.point), Some(AreaId(0)));

        q.filter = AreaFilter::Elsewhere { current: None };
        assert!(scorer.best(&world, &mut rng, &q).is_none());
    }
}
