//! World orchestration
//!
//! The `World` exclusively owns the massive bodies and the spacecraft and
//! advances them in a two-phase tick: every massive body first (publishing
//! its per-tick displacement), then every spacecraft. Spacecraft spawned
//! between ticks are queued and join at the next tick boundary.
//!
//! It is inserted into Bevy as a `Resource` and driven by the viewer, or
//! stepped directly in headless runs and tests.

use bevy::prelude::Resource;
use tracing::{debug, debug_span, info};

use crate::error::{ConfigError, ConfigResult};
use crate::simulation::engine::Engine;
use crate::simulation::forces::field_at;
use crate::simulation::params::Parameters;
use crate::simulation::states::{BodyId, CraftId, DynamicBody, MassiveBody, Mobility, NVec2};

/// Initial state of a massive body.
#[derive(Debug, Clone)]
pub struct MassiveSpec {
    pub name: String,
    pub x: NVec2,
    pub v: NVec2,
    pub m: f64,
    pub radius: f64,
    pub mobility: Mobility,
}

/// Initial state of a spacecraft.
#[derive(Debug, Clone, Copy)]
pub struct CraftSpec {
    pub x: NVec2,
    pub v: NVec2,
    pub m: f64,
    pub size: f64,
}

#[derive(Resource)]
pub struct World {
    pub parameters: Parameters,
    pub engine: Engine,
    massive: Vec<MassiveBody>,
    crafts: Vec<DynamicBody>,
    pending: Vec<DynamicBody>, // spawned, joins at the next tick
    default_craft: Option<CraftSpec>,
    current: Option<CraftId>,
    next_craft_id: u64,
}

impl World {
    /// Build a world; malformed bodies or parameters are rejected here and
    /// nowhere else.
    pub fn new(
        parameters: Parameters,
        bodies: Vec<MassiveSpec>,
        default_craft: Option<CraftSpec>,
    ) -> ConfigResult<Self> {
        validate_parameters(&parameters)?;

        let mut massive = Vec::with_capacity(bodies.len());
        for (i, spec) in bodies.into_iter().enumerate() {
            validate_massive(&spec)?;
            massive.push(MassiveBody::new(
                BodyId(i),
                spec.name,
                spec.x,
                spec.v,
                spec.m,
                spec.radius,
                spec.mobility,
                parameters.G,
            ));
        }
        if let Some(spec) = &default_craft {
            validate_craft(spec)?;
        }

        let engine = Engine::new(&parameters);
        let mut world = Self {
            parameters,
            engine,
            massive,
            crafts: Vec::new(),
            pending: Vec::new(),
            default_craft,
            current: None,
            next_craft_id: 0,
        };

        // The configured craft is present from the first tick on
        if world.add_default_spacecraft().is_some() {
            world.crafts.append(&mut world.pending);
        }

        info!(
            massive = world.massive.len(),
            crafts = world.crafts.len(),
            "world initialized"
        );
        Ok(world)
    }

    /// Advance the world by one host frame of `real_dt` seconds and return
    /// the simulation step actually taken.
    pub fn tick(&mut self, real_dt: f64) -> f64 {
        // Spawns queued since the last tick join now, never mid-iteration
        self.crafts.append(&mut self.pending);

        let dt = self.engine.scaled_dt(real_dt, &self.parameters);
        if dt <= 0.0 {
            return 0.0;
        }

        // Phase 1: massive bodies, so their displacement is published before
        // any spacecraft reads it
        for i in 0..self.massive.len() {
            if self.massive[i].is_fixed() {
                continue;
            }
            let id = self.massive[i].id;
            let radius = self.massive[i].radius;
            let mut motion = self.massive[i].motion.clone();
            {
                let _span = debug_span!("massive", name = %self.massive[i].name).entered();
                motion.step(Some(id), radius, &self.massive, dt);
            }
            self.massive[i].advance_to(motion);
        }

        // Phase 2: spacecraft
        let massive: &[MassiveBody] = &self.massive;
        for craft in self.crafts.iter_mut() {
            let _span = debug_span!("craft", id = craft.id.0).entered();
            craft.motion.step(None, craft.size, massive, dt);
        }

        self.engine.t += dt;
        dt
    }

    /// Combined gravity at `p` from every massive body except `excluding`.
    pub fn gravity_at(&self, p: NVec2, excluding: Option<BodyId>) -> NVec2 {
        field_at(&self.massive, p, excluding)
    }

    pub fn massive_bodies(&self) -> &[MassiveBody] {
        &self.massive
    }

    pub fn massive_body(&self, id: BodyId) -> Option<&MassiveBody> {
        self.massive.get(id.0)
    }

    /// Spacecraft taking part in the simulation (queued spawns excluded).
    pub fn spacecraft(&self) -> &[DynamicBody] {
        &self.crafts
    }

    pub fn craft(&self, id: CraftId) -> Option<&DynamicBody> {
        self.crafts.iter().chain(self.pending.iter()).find(|c| c.id == id)
    }

    pub fn craft_mut(&mut self, id: CraftId) -> Option<&mut DynamicBody> {
        self.crafts
            .iter_mut()
            .chain(self.pending.iter_mut())
            .find(|c| c.id == id)
    }

    pub fn current_craft_id(&self) -> Option<CraftId> {
        self.current
    }

    pub fn current_craft(&self) -> Option<&DynamicBody> {
        self.current.and_then(|id| self.craft(id))
    }

    /// Queue a new spacecraft and focus it. It is stepped from the next tick on.
    pub fn spawn(&mut self, spec: CraftSpec) -> CraftId {
        let id = CraftId(self.next_craft_id);
        self.next_craft_id += 1;

        self.pending
            .push(DynamicBody::new(id, spec.x, spec.v, spec.m, spec.size));
        info!(id = id.0, x = spec.x.x, y = spec.x.y, "spacecraft spawned");
        self.focus(id);
        id
    }

    /// Spawn the configured default spacecraft, if the scenario has one.
    pub fn add_default_spacecraft(&mut self) -> Option<CraftId> {
        let spec = self.default_craft?;
        Some(self.spawn(spec))
    }

    /// Spawn a copy of the current spacecraft's state.
    pub fn clone_current_spacecraft(&mut self) -> Option<CraftId> {
        let craft = self.current_craft()?;
        let spec = CraftSpec {
            x: craft.position(),
            v: craft.velocity(),
            m: craft.m,
            size: craft.size,
        };
        Some(self.spawn(spec))
    }

    pub fn next_spacecraft(&mut self) -> Option<CraftId> {
        self.cycle(1)
    }

    pub fn prev_spacecraft(&mut self) -> Option<CraftId> {
        self.cycle(-1)
    }

    /// Point the current spacecraft's booster along `direction` (scaled by the
    /// configured booster force). While thrusting, the time scale is capped;
    /// a crashed craft takes no thrust and leaves it alone.
    pub fn set_thrust(&mut self, direction: NVec2) {
        let force = self.parameters.booster_force;
        let Some(id) = self.current else {
            return;
        };
        let applied = self
            .craft_mut(id)
            .is_some_and(|craft| craft.set_extra_acceleration(direction * force));
        if applied && direction != NVec2::zeros() {
            self.engine.cap_time_scale(self.parameters.max_thrust_time_scale);
        }
    }

    /// Multiply the time scale by 10^steps within the configured bounds.
    pub fn scale_time(&mut self, steps: i32) {
        self.engine.scale_time(steps, &self.parameters);
        if self.is_any_thrusting() {
            self.engine.cap_time_scale(self.parameters.max_thrust_time_scale);
        }
        debug!(time_scale = self.engine.time_scale(), "time scale changed");
    }

    pub fn time_scale(&self) -> f64 {
        self.engine.time_scale()
    }

    /// Simulation time elapsed.
    pub fn time(&self) -> f64 {
        self.engine.t
    }

    fn is_any_thrusting(&self) -> bool {
        self.crafts
            .iter()
            .chain(self.pending.iter())
            .any(|c| c.motion.is_thrusting())
    }

    /// Change focus; the craft losing focus stops thrusting.
    fn focus(&mut self, id: CraftId) {
        if let Some(previous) = self.current {
            if previous != id {
                if let Some(craft) = self.craft_mut(previous) {
                    craft.set_extra_acceleration(NVec2::zeros());
                }
            }
        }
        self.current = Some(id);
    }

    fn cycle(&mut self, step: isize) -> Option<CraftId> {
        let ids: Vec<CraftId> = self
            .crafts
            .iter()
            .chain(self.pending.iter())
            .map(|c| c.id)
            .collect();
        if ids.is_empty() {
            return None;
        }

        let n = ids.len() as isize;
        let index = self
            .current
            .and_then(|id| ids.iter().position(|&c| c == id))
            .map_or(0, |i| (i as isize + step).rem_euclid(n) as usize);

        let id = ids[index];
        self.focus(id);
        debug!(id = id.0, "focus changed");
        Some(id)
    }
}

fn validate_parameters(p: &Parameters) -> ConfigResult<()> {
    if !(p.G.is_finite() && p.G > 0.0) {
        return Err(ConfigError::parameter("G", p.G, "must be finite and > 0"));
    }
    if !(p.max_dt.is_finite() && p.max_dt > 0.0) {
        return Err(ConfigError::parameter("max_dt", p.max_dt, "must be finite and > 0"));
    }
    let (min, max) = (p.min_time_scale, p.max_time_scale);
    if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
        return Err(ConfigError::TimeScaleBounds { min, max });
    }
    if !(p.time_scale >= min && p.time_scale <= max) {
        return Err(ConfigError::parameter(
            "time_scale",
            p.time_scale,
            "must lie within [min_time_scale, max_time_scale]",
        ));
    }
    if !(p.max_thrust_time_scale.is_finite() && p.max_thrust_time_scale > 0.0) {
        return Err(ConfigError::parameter(
            "max_thrust_time_scale",
            p.max_thrust_time_scale,
            "must be finite and > 0",
        ));
    }
    if !(p.booster_force.is_finite() && p.booster_force >= 0.0) {
        return Err(ConfigError::parameter(
            "booster_force",
            p.booster_force,
            "must be finite and >= 0",
        ));
    }
    Ok(())
}

fn validate_massive(spec: &MassiveSpec) -> ConfigResult<()> {
    if !(spec.m.is_finite() && spec.m > 0.0) {
        return Err(ConfigError::InvalidMass { name: spec.name.clone(), m: spec.m });
    }
    if !(spec.radius.is_finite() && spec.radius >= 0.0) {
        return Err(ConfigError::InvalidRadius {
            name: spec.name.clone(),
            radius: spec.radius,
        });
    }
    check_finite(spec.x, &format!("{}.x", spec.name))?;
    check_finite(spec.v, &format!("{}.v", spec.name))
}

fn validate_craft(spec: &CraftSpec) -> ConfigResult<()> {
    if !(spec.m.is_finite() && spec.m > 0.0) {
        return Err(ConfigError::InvalidMass { name: "spacecraft".into(), m: spec.m });
    }
    if !(spec.size.is_finite() && spec.size >= 0.0) {
        return Err(ConfigError::InvalidRadius {
            name: "spacecraft".into(),
            radius: spec.size,
        });
    }
    check_finite(spec.x, "spacecraft.x")?;
    check_finite(spec.v, "spacecraft.v")
}

fn check_finite(v: NVec2, field: &str) -> ConfigResult<()> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field: field.to_string() })
    }
}
