//! Cooperative tactical search.
//!
//! [`TacticalAi`] drains its producers one candidate at a time: every call
//! to [`TacticalAi::run_one_unit`] pops a producer, pulls one maneuver from
//! it, scores it and puts the producer back at the end of the queue. The
//! host decides when to call again, so a search can be spread over as many
//! scheduler slices as needed, and cancelled by simply dropping it.

use std::collections::VecDeque;

use tactics_core::ShipId;

use super::evaluators::{self, Evaluator};
use super::maneuver::{Maneuver, SearchContext};
use super::producers::{self, Producer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Producing,
    Done,
}

pub struct TacticalAi<'a> {
    ctx: SearchContext<'a>,
    producers: VecDeque<Producer<'a>>,
    evaluators: Vec<Evaluator>,
    best: Option<Maneuver>,
    best_score: f64,
    produced: usize,
    evaluated: usize,
    state: SearchState,
}

impl<'a> TacticalAi<'a> {
    /// Search with the default producers and evaluators.
    pub fn new(ctx: SearchContext<'a>) -> Self {
        Self::with_parts(ctx, producers::defaults(ctx), evaluators::defaults())
    }

    pub fn with_parts(
        ctx: SearchContext<'a>,
        producers: Vec<Producer<'a>>,
        evaluators: Vec<Evaluator>,
    ) -> Self {
        Self {
            ctx,
            producers: producers.into(),
            evaluators,
            best: None,
            best_score: f64::NEG_INFINITY,
            produced: 0,
            evaluated: 0,
            state: SearchState::Idle,
        }
    }

    pub fn ship(&self) -> ShipId {
        self.ctx.ship.id
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn produced(&self) -> usize {
        self.produced
    }

    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    pub fn best(&self) -> Option<&Maneuver> {
        self.best.as_ref()
    }

    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    /// Ends the search and hands over the best maneuver found.
    pub fn into_best(self) -> Option<Maneuver> {
        self.best
    }

    /// Sum of the weighted evaluator scores.
    pub fn evaluate(&self, maneuver: &Maneuver) -> f64 {
        self.evaluators
            .iter()
            .map(|evaluator| {
                let score = evaluator.evaluate(&self.ctx, maneuver);
                tracing::trace!(evaluator = evaluator.name, score, "evaluated");
                score
            })
            .sum()
    }

    /// Runs one unit of work. Returns false once every producer is
    /// exhausted.
    pub fn run_one_unit(&mut self) -> bool {
        if self.state == SearchState::Done {
            return false;
        }
        self.state = SearchState::Producing;

        let Some(mut producer) = self.producers.pop_front() else {
            return self.finish();
        };
        let Some(maneuver) = producer.next() else {
            return if self.producers.is_empty() {
                self.finish()
            } else {
                true
            };
        };
        self.producers.push_back(producer);
        self.produced += 1;

        if maneuver.is_possible() {
            let score = self.evaluate(&maneuver);
            self.evaluated += 1;
            tracing::trace!(action = %maneuver.action, target = %maneuver.target, score, "maneuver scored");
            if score > self.best_score {
                self.best_score = score;
                self.best = Some(maneuver);
            }
        }
        true
    }

    fn finish(&mut self) -> bool {
        self.state = SearchState::Done;
        tracing::debug!(
            ship = %self.ctx.ship.id,
            produced = self.produced,
            evaluated = self.evaluated,
            best = ?self.best.as_ref().map(|maneuver| maneuver.action),
            score = self.best_score,
            "search done"
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ai::tests::{ENGINE, GUN, RNG, skirmish};
    use tactics_core::{ActionRef, BattleEngine, Target};

    /// Score encoded in the move target, 20km per point along x.
    fn encoded(ctx: &SearchContext<'_>, maneuver: &Maneuver) -> f64 {
        (maneuver.target.location().x - ctx.ship.location().x) / 20.0
    }

    fn scripted<'a>(ctx: SearchContext<'a>, scores: &[f64], lane: f64) -> Producer<'a> {
        let origin = ctx.ship.location();
        let targets: Vec<_> = scores
            .iter()
            .map(|score| Target::at(origin.x + score * 20.0, origin.y + lane))
            .collect();
        Box::new(
            targets
                .into_iter()
                .filter_map(move |target| Maneuver::new(&ctx, ActionRef::Equipment(ENGINE), target)),
        )
    }

    #[test]
    fn keeps_the_best_score_across_producers() {
        let mut battle = skirmish(1000.0);
        let ctx = SearchContext::new(&battle, ShipId(1), &RNG).unwrap();
        let mut ai = TacticalAi::with_parts(
            ctx,
            vec![
                scripted(ctx, &[1.0, -8.0, 4.0], 0.0),
                scripted(ctx, &[3.0, 7.0, 0.0, 6.0, 1.0], 0.0),
            ],
            vec![Evaluator::new("encoded", 1.0, encoded)],
        );
        assert_eq!(ai.state(), SearchState::Idle);

        let mut units = 0;
        while ai.run_one_unit() {
            units += 1;
            assert_eq!(ai.state(), SearchState::Producing);
        }
        assert_eq!(ai.state(), SearchState::Done);
        assert!(!ai.run_one_unit());
        assert_eq!(ai.produced(), 8);
        assert!(units >= 8);
        assert_eq!(ai.best_score(), 7.0);

        let best = ai.into_best().unwrap();
        let destination = best.simulation.move_location;
        let mut engine = BattleEngine::new(&mut battle, &RNG);
        for part in &best.simulation.parts {
            engine.apply_action(part.action, Some(part.target)).unwrap();
        }
        let moved = battle.ship(ShipId(1)).unwrap().location();
        assert!((moved.x - destination.x).abs() < 1e-9);
        assert!((moved.x - 240.0).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_the_earliest_maneuver() {
        let battle = skirmish(1000.0);
        let ctx = SearchContext::new(&battle, ShipId(1), &RNG).unwrap();
        let mut ai = TacticalAi::with_parts(
            ctx,
            vec![
                scripted(ctx, &[2.0, 5.0], 10.0),
                scripted(ctx, &[5.0], 20.0),
            ],
            vec![Evaluator::new("encoded", 1.0, encoded)],
        );
        while ai.run_one_unit() {}

        let best = ai.into_best().unwrap();
        assert_eq!(best.target.location().y - ctx.ship.location().y, 20.0);
    }

    #[test]
    fn default_search_prefers_shooting_over_idling() {
        let battle = skirmish(500.0);
        let ctx = SearchContext::new(&battle, ShipId(1), &RNG).unwrap();
        let mut ai = TacticalAi::new(ctx);
        while ai.run_one_unit() {}

        let best = ai.best().unwrap();
        assert_eq!(best.action, ActionRef::Equipment(GUN));
        assert!(ai.evaluated() > 1);
    }

    #[test]
    fn empty_search_finds_nothing() {
        let battle = skirmish(500.0);
        let ctx = SearchContext::new(&battle, ShipId(1), &RNG).unwrap();
        let mut ai = TacticalAi::with_parts(ctx, Vec::new(), evaluators::defaults());
        assert!(!ai.run_one_unit());
        assert!(ai.into_best().is_none());
    }
}
