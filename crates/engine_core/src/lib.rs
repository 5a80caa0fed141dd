use std::thread;
use std::time::{Duration, Instant};

use kinematics::validation::{validate_state, ValidationContext};
use kinematics::{IntegrationPolicy, KinematicState, Rotation, Vector3};

pub mod clock;

pub use clock::FixedStep;

/// Slot of a body inside an [`Engine`]. Ids are never reused, so an id
/// stays valid (or dead) for the engine's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

/// Interpolated pose of one body for a render frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPose {
    pub id: BodyId,
    pub position: Vector3,
    pub rotation: Rotation,
}

/// Everything a tick phase may touch.
pub struct State {
    pub tick: u64,
    pub dt: f64,
    pub policy: IntegrationPolicy,
    pub validation: ValidationContext,
    /// `None` once the body has been despawned.
    pub bodies: Vec<Option<KinematicState>>,
    /// Force applied to each body on every tick until cleared.
    pub forces: Vec<Option<Vector3>>,
}

impl State {
    fn new(dt: f64) -> Self {
        Self {
            tick: 0,
            dt,
            policy: IntegrationPolicy::default(),
            validation: ValidationContext::new(dt),
            bodies: Vec::new(),
            forces: Vec::new(),
        }
    }
}

pub struct Schedule {
    phases: Vec<fn(&mut State)>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            phases: vec![phase_forces, phase_integrate, phase_validate],
        }
    }
    pub fn run(&self, s: &mut State) {
        for sys in &self.phases {
            sys(s);
        }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

fn phase_forces(s: &mut State) {
    let dt = s.dt;
    for (body, force) in s.bodies.iter_mut().zip(&s.forces) {
        if let (Some(body), Some(f)) = (body, force) {
            body.apply_force(*f, dt);
        }
    }
}

fn phase_integrate(s: &mut State) {
    let (dt, policy) = (s.dt, s.policy);
    for body in s.bodies.iter_mut().flatten() {
        body.update_with(dt, &policy);
    }
}

// Report only; degenerate bodies keep simulating as they are
fn phase_validate(s: &mut State) {
    for (index, body) in s.bodies.iter().enumerate() {
        let Some(body) = body else { continue };
        let result = validate_state(body, &s.validation);
        if !result.is_valid() {
            tracing::warn!(
                tick = s.tick,
                body = index,
                "validation failed: {}",
                result.summary()
            );
        }
    }
}

/// Copy of every body at one tick, safe to hand to a render thread.
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub bodies: Vec<(BodyId, KinematicState)>,
}

impl RenderSnapshot {
    pub fn render_poses(&self, alpha: f64) -> Vec<RenderPose> {
        render_poses(self.bodies.iter().map(|(id, b)| (*id, b)), alpha)
    }
}

fn render_poses<'a, I>(bodies: I, alpha: f64) -> Vec<RenderPose>
where
    I: Iterator<Item = (BodyId, &'a KinematicState)>,
{
    bodies
        .map(|(id, b)| RenderPose {
            id,
            position: b.render_position(alpha),
            rotation: b.render_rotation(alpha),
        })
        .collect()
}

pub struct Engine {
    tick_hz: u32,
    clock: FixedStep,
    state: State,
    schedule: Schedule,
}

impl Engine {
    pub fn new_fixed_hz(tick_hz: u32) -> Self {
        let clock = FixedStep::from_hz(tick_hz);
        Self {
            tick_hz,
            state: State::new(clock.dt()),
            clock,
            schedule: Schedule::new(),
        }
    }

    pub fn with_policy(mut self, policy: IntegrationPolicy) -> Self {
        self.state.policy = policy;
        self
    }

    pub fn with_validation(mut self, validation: ValidationContext) -> Self {
        self.state.validation = validation;
        self
    }

    pub fn with_max_steps_per_frame(mut self, max_steps: u32) -> Self {
        self.clock = self.clock.with_max_steps_per_frame(max_steps);
        self
    }

    pub fn spawn(&mut self, body: KinematicState) -> BodyId {
        self.state.bodies.push(Some(body));
        self.state.forces.push(None);
        BodyId(self.state.bodies.len() - 1)
    }

    /// Removes the body and its force, returning its last state.
    pub fn despawn(&mut self, id: BodyId) -> Option<KinematicState> {
        let body = self.state.bodies.get_mut(id.0)?.take()?;
        self.state.forces[id.0] = None;
        tracing::debug!(body = id.0, "despawned");
        Some(body)
    }

    pub fn body(&self, id: BodyId) -> Option<&KinematicState> {
        self.state.bodies.get(id.0)?.as_ref()
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut KinematicState> {
        self.state.bodies.get_mut(id.0)?.as_mut()
    }

    /// Live bodies in spawn order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &KinematicState)> + '_ {
        self.state
            .bodies
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.as_ref().map(|b| (BodyId(i), b)))
    }

    /// Applies `force` to the body at the start of every tick. `None` clears it.
    /// Returns false for an unknown or despawned body.
    pub fn set_force(&mut self, id: BodyId, force: Option<Vector3>) -> bool {
        if self.body(id).is_none() {
            return false;
        }
        self.state.forces[id.0] = force;
        true
    }

    pub fn tick(&self) -> u64 {
        self.state.tick
    }

    pub fn dt(&self) -> f64 {
        self.clock.dt()
    }

    pub fn tick_once(&mut self) {
        // deterministic order
        self.schedule.run(&mut self.state);
        self.state.tick = self.state.tick.wrapping_add(1);
        tracing::trace!(tick = self.state.tick, "tick");
    }

    /// Runs the ticks that `frame_time` seconds make due and returns the
    /// render ratio for this frame.
    pub fn frame(&mut self, frame_time: f64) -> f64 {
        let steps = self.clock.advance(frame_time);
        for _ in 0..steps {
            self.tick_once();
        }
        self.clock.alpha()
    }

    pub fn render_poses(&self, alpha: f64) -> Vec<RenderPose> {
        render_poses(self.bodies(), alpha)
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            tick: self.state.tick,
            bodies: self.bodies().map(|(id, b)| (id, *b)).collect(),
        }
    }

    /// Real-time loop: one render frame every `frame_interval`, until `duration`
    /// has elapsed. `on_frame` receives the engine and the render ratio.
    pub fn run_blocking<F>(&mut self, duration: Duration, frame_interval: Duration, mut on_frame: F)
    where
        F: FnMut(&Engine, f64),
    {
        let start = Instant::now();
        let mut last_frame = start;
        let mut last_report = start;
        let mut ticks_at_report = self.state.tick;

        while start.elapsed() < duration {
            let now = Instant::now();
            let frame_time = now.duration_since(last_frame).as_secs_f64();
            last_frame = now;

            let alpha = self.frame(frame_time);
            on_frame(self, alpha);

            // 1 Hz telemetry
            if last_report.elapsed() >= Duration::from_secs(1) {
                tracing::info!(
                    tick = self.state.tick,
                    hz = self.tick_hz,
                    last_sec_ticks = self.state.tick - ticks_at_report,
                    bodies = self.bodies().count(),
                    "engine"
                );
                ticks_at_report = self.state.tick;
                last_report = Instant::now();
            }

            let elapsed = now.elapsed();
            if elapsed < frame_interval {
                thread::sleep(frame_interval - elapsed);
            }
        }
    }
}
