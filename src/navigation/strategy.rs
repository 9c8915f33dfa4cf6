//! Navigation-phase controllers.
//!
//! Both controllers sit behind [`NavigationStrategy`]; the
//! [`NavigationController`](super::NavigationController) owns one as a trait
//! object and never branches on which one it has.
//!
//! - [`HybridRouteStrategy`]: follow an A* route, drop to the potential field
//!   when planning fails or the route turns out blocked.
//! - [`GradientDescentStrategy`]: momentum descent on the measured field with
//!   random escape kicks when progress stalls.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::core::{DomainBounds, GridCoord, RobotState, WorldPoint};
use crate::environment::Environment;
use crate::error::KshetraError;
use crate::grid::OccupancyGrid;
use crate::pathfinding::{PathFailure, plan_route};

use super::config::{GradientConfig, NavigationConfig, StrategyKind};
use super::events::{FallbackReason, NavEvent};
use super::potential::{PotentialField, ReactiveStep};

/// Read-only world view handed to a strategy each tick.
#[derive(Clone, Copy)]
pub struct NavContext<'a> {
    pub target: WorldPoint,
    pub grid: &'a OccupancyGrid,
    pub env: &'a dyn Environment,
    pub bounds: DomainBounds,
}

/// What a strategy reports after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyStatus {
    Active,
    /// Target cell is free but walled off from the robot
    Unreachable(GridCoord),
    /// Strategy gave up searching
    Converged,
    /// Every route waypoint was reached
    RouteExhausted,
}

/// A navigation-phase controller.
pub trait NavigationStrategy {
    /// Name for logging
    fn name(&self) -> &'static str;

    /// Called once, on the tick the navigation phase starts.
    fn begin(
        &mut self,
        ctx: &NavContext<'_>,
        robot: &RobotState,
        events: &mut Vec<NavEvent>,
    ) -> StrategyStatus;

    /// Move the robot by at most the configured max speed.
    fn step(
        &mut self,
        ctx: &NavContext<'_>,
        robot: &mut RobotState,
        events: &mut Vec<NavEvent>,
    ) -> StrategyStatus;

    /// Remaining waypoints, if the strategy follows a route.
    fn planned_path(&self) -> &[WorldPoint];
}

/// Build the strategy selected in `config`.
pub fn create_strategy(config: &NavigationConfig) -> Box<dyn NavigationStrategy> {
    match config.strategy {
        StrategyKind::Hybrid => Box::new(HybridRouteStrategy::new(config)),
        StrategyKind::GradientDescent => Box::new(GradientDescentStrategy::new(config)),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Route,
    Reactive,
}

/// Route following with potential-field fallback.
#[derive(Clone, Debug)]
pub struct HybridRouteStrategy {
    field: PotentialField,
    max_speed: f32,
    approach_gain: f32,
    waypoint_tolerance: f32,
    arrival_tolerance: f32,
    route: Vec<WorldPoint>,
    index: usize,
    mode: Mode,
}

impl HybridRouteStrategy {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            field: PotentialField::new(config),
            max_speed: config.max_speed,
            approach_gain: config.approach_gain,
            waypoint_tolerance: config.waypoint_tolerance,
            arrival_tolerance: config.arrival_tolerance,
            route: Vec::new(),
            index: 0,
            mode: Mode::Route,
        }
    }

    /// Is the potential field in control?
    pub fn is_reactive(&self) -> bool {
        self.mode == Mode::Reactive
    }

    fn fall_back(&mut self, reason: FallbackReason, events: &mut Vec<NavEvent>) {
        warn!("[Hybrid] reactive fallback: {:?}", reason);
        self.mode = Mode::Reactive;
        self.route.clear();
        self.index = 0;
        events.push(NavEvent::FallbackEngaged { reason });
    }

    /// Skip waypoints already within tolerance, as long as the one after is
    /// in line of sight. A waypoint is never skipped past a blocked corner.
    /// The final waypoint is the target and uses the arrival tolerance.
    fn advance_index(&mut self, position: WorldPoint, grid: &OccupancyGrid) {
        while let Some(&wp) = self.route.get(self.index) {
            let distance = position.distance(&wp);
            let tolerance = if self.index + 1 == self.route.len() {
                self.arrival_tolerance
            } else {
                self.waypoint_tolerance
            };
            if distance >= tolerance {
                break;
            }
            let sees_next = match self.route.get(self.index + 1) {
                Some(&next) => distance < f32::EPSILON || grid.segment_clear(position, next),
                None => true,
            };
            if !sees_next {
                break;
            }
            self.index += 1;
        }
    }

    fn reactive_step(&self, ctx: &NavContext<'_>, robot: &mut RobotState) {
        if self.field.step(robot, ctx.target, ctx.grid, &ctx.bounds) == ReactiveStep::Blocked {
            debug!(
                "[Hybrid] boxed in at ({:.1},{:.1})",
                robot.position.x, robot.position.y
            );
        }
    }
}

impl NavigationStrategy for HybridRouteStrategy {
    fn name(&self) -> &'static str {
        "hybrid"
    }

    fn begin(
        &mut self,
        ctx: &NavContext<'_>,
        robot: &RobotState,
        events: &mut Vec<NavEvent>,
    ) -> StrategyStatus {
        self.mode = Mode::Route;
        self.route.clear();
        self.index = 0;

        match plan_route(ctx.grid, robot.position, ctx.target) {
            Ok(route) => {
                // Start cell is where we stand; the goal cell centre is
                // replaced by the exact target.
                self.route = route.waypoints.iter().skip(1).copied().collect();
                match self.route.last_mut() {
                    Some(last) => *last = ctx.target,
                    None => self.route.push(ctx.target),
                }
                info!(
                    "[Hybrid] route planned: {} waypoints, {:.1} long",
                    self.route.len(),
                    route.length
                );
                events.push(NavEvent::RoutePlanned {
                    waypoints: self.route.len(),
                    length: route.length,
                });
                StrategyStatus::Active
            }
            Err(KshetraError::NoPathFound(PathFailure::Unreachable)) => {
                StrategyStatus::Unreachable(ctx.grid.world_to_grid(ctx.target))
            }
            Err(KshetraError::NoPathFound(reason)) => {
                self.fall_back(FallbackReason::NoPath(reason), events);
                StrategyStatus::Active
            }
            Err(e) => {
                warn!("[Hybrid] route planning error: {}", e);
                self.fall_back(FallbackReason::PlanningError, events);
                StrategyStatus::Active
            }
        }
    }

    fn step(
        &mut self,
        ctx: &NavContext<'_>,
        robot: &mut RobotState,
        events: &mut Vec<NavEvent>,
    ) -> StrategyStatus {
        if self.mode == Mode::Reactive {
            self.reactive_step(ctx, robot);
            return StrategyStatus::Active;
        }

        self.advance_index(robot.position, ctx.grid);
        let Some(&waypoint) = self.route.get(self.index) else {
            info!(
                "[Hybrid] route exhausted at ({:.1},{:.1})",
                robot.position.x, robot.position.y
            );
            robot.hold();
            events.push(NavEvent::RouteExhausted);
            return StrategyStatus::RouteExhausted;
        };

        if !ctx.grid.segment_clear(robot.position, waypoint) {
            self.fall_back(FallbackReason::SegmentBlocked, events);
            self.reactive_step(ctx, robot);
            return StrategyStatus::Active;
        }

        let to_waypoint = waypoint - robot.position;
        let speed = self
            .max_speed
            .min(self.approach_gain * robot.position.distance(&ctx.target))
            .min(to_waypoint.length());
        let step = to_waypoint.normalize() * speed;

        if ctx.grid.is_occupied_at(ctx.bounds.clamp(robot.position + step)) {
            self.fall_back(FallbackReason::StepBlocked, events);
            self.reactive_step(ctx, robot);
        } else {
            robot.advance(step, self.max_speed, &ctx.bounds);
        }
        StrategyStatus::Active
    }

    fn planned_path(&self) -> &[WorldPoint] {
        self.route.get(self.index..).unwrap_or(&[])
    }
}

/// Momentum descent on the field gradient with stuck detection.
///
/// The descent direction is the negated central-difference gradient, scaled
/// by an annealed learning rate and combined with obstacle repulsion. When
/// the best sampled value fails to improve for `stuck_ticks`, the robot is
/// kicked in a random direction; after `max_kicks` the search is over.
#[derive(Clone, Debug)]
pub struct GradientDescentStrategy {
    config: GradientConfig,
    field: PotentialField,
    max_speed: f32,
    momentum_decay: f32,
    rng: StdRng,
    learning_rate: f32,
    best_value: f32,
    best_position: WorldPoint,
    stalled_ticks: u32,
    kicks: u32,
}

impl GradientDescentStrategy {
    pub fn new(config: &NavigationConfig) -> Self {
        let gradient = config.gradient.clone();
        Self {
            rng: StdRng::seed_from_u64(gradient.seed),
            learning_rate: gradient.learning_rate,
            config: gradient,
            field: PotentialField::new(config),
            max_speed: config.max_speed,
            momentum_decay: config.momentum_decay,
            best_value: f32::INFINITY,
            best_position: WorldPoint::ZERO,
            stalled_ticks: 0,
            kicks: 0,
        }
    }

    /// Lowest field value seen and where
    pub fn best(&self) -> (WorldPoint, f32) {
        (self.best_position, self.best_value)
    }

    pub fn kicks(&self) -> u32 {
        self.kicks
    }

    /// Negated central-difference gradient (the descent direction).
    pub fn descent_direction(&self, env: &dyn Environment, p: WorldPoint) -> WorldPoint {
        let d = self.config.gradient_delta;
        let gx = env.sample(WorldPoint::new(p.x + d, p.y))
            - env.sample(WorldPoint::new(p.x - d, p.y));
        let gy = env.sample(WorldPoint::new(p.x, p.y + d))
            - env.sample(WorldPoint::new(p.x, p.y - d));
        WorldPoint::new(-gx, -gy) * (1.0 / (2.0 * d))
    }

    fn kick(&mut self, ctx: &NavContext<'_>, robot: &mut RobotState) {
        let angle = self.rng.random_range(0.0..TAU);
        let displacement = WorldPoint::new(angle.cos(), angle.sin()) * self.max_speed;
        PotentialField::try_move(robot, displacement, ctx.grid, &ctx.bounds);
        self.kicks += 1;
        self.stalled_ticks = 0;
        debug!(
            "[Gradient] kick {} toward {:.2} rad, now at ({:.1},{:.1})",
            self.kicks, angle, robot.position.x, robot.position.y
        );
    }
}

impl NavigationStrategy for GradientDescentStrategy {
    fn name(&self) -> &'static str {
        "gradient_descent"
    }

    fn begin(
        &mut self,
        ctx: &NavContext<'_>,
        robot: &RobotState,
        _events: &mut Vec<NavEvent>,
    ) -> StrategyStatus {
        self.learning_rate = self.config.learning_rate;
        self.best_value = ctx.env.sample(robot.position);
        self.best_position = robot.position;
        self.stalled_ticks = 0;
        self.kicks = 0;
        info!(
            "[Gradient] descent from ({:.1},{:.1}), value {:.1}",
            robot.position.x, robot.position.y, self.best_value
        );
        StrategyStatus::Active
    }

    fn step(
        &mut self,
        ctx: &NavContext<'_>,
        robot: &mut RobotState,
        events: &mut Vec<NavEvent>,
    ) -> StrategyStatus {
        if self.stalled_ticks >= self.config.stuck_ticks {
            if self.kicks >= self.config.max_kicks {
                info!(
                    "[Gradient] converged at ({:.1},{:.1}), best {:.1}",
                    self.best_position.x, self.best_position.y, self.best_value
                );
                robot.hold();
                events.push(NavEvent::Converged {
                    position: self.best_position,
                    value: self.best_value,
                });
                return StrategyStatus::Converged;
            }
            self.kick(ctx, robot);
        } else {
            let descent = self.descent_direction(ctx.env, robot.position) * self.learning_rate;
            let net = descent + self.field.repulsion(robot.position, ctx.grid);
            let velocity = robot.velocity * self.momentum_decay + net;
            PotentialField::try_move(
                robot,
                velocity.clamp_length(self.max_speed),
                ctx.grid,
                &ctx.bounds,
            );
        }

        let value = ctx.env.sample(robot.position);
        if value < self.best_value - self.config.improvement_threshold {
            self.best_value = value;
            self.best_position = robot.position;
            self.stalled_ticks = 0;
        } else {
            self.stalled_ticks += 1;
        }
        self.learning_rate =
            (self.learning_rate * self.config.anneal_rate).max(self.config.min_learning_rate);

        StrategyStatus::Active
    }

    fn planned_path(&self) -> &[WorldPoint] {
        &[]
    }
}
