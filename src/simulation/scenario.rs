//! Build a fully-initialized world from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime `World`:
//! - parameters (`Parameters`)
//! - massive bodies in update order
//! - the default spacecraft, already spawned
//!
//! Vector shapes are checked here; masses, radii and parameter ranges are
//! checked by `World::new`

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::configuration::config::{BodyConfig, ScenarioConfig, SpacecraftConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Mobility, NVec2};
use crate::simulation::world::{CraftSpec, MassiveSpec, World};

/// Read a scenario file
pub fn load_scenario(path: &Path) -> ConfigResult<ScenarioConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_yaml::from_reader(reader)?)
}

/// Map a scenario onto a runtime world
pub fn build_scenario(cfg: ScenarioConfig) -> ConfigResult<World> {
    // Parameters (runtime) from ParametersConfig
    let p_cfg = cfg.parameters;
    let parameters = Parameters {
        G: p_cfg.G,
        max_dt: p_cfg.max_dt,
        time_scale: p_cfg.time_scale,
        min_time_scale: p_cfg.min_time_scale,
        max_time_scale: p_cfg.max_time_scale,
        max_thrust_time_scale: p_cfg.max_thrust_time_scale,
        booster_force: p_cfg.booster_force,
    };

    // Bodies: map `BodyConfig` -> `MassiveSpec` using nalgebra vectors
    let bodies = cfg
        .bodies
        .iter()
        .enumerate()
        .map(|(i, bc)| massive_spec(i, bc))
        .collect::<ConfigResult<Vec<_>>>()?;

    let spacecraft = cfg.spacecraft.as_ref().map(craft_spec).transpose()?;

    World::new(parameters, bodies, spacecraft)
}

fn massive_spec(i: usize, bc: &BodyConfig) -> ConfigResult<MassiveSpec> {
    let name = bc.name.clone().unwrap_or_else(|| format!("body{i}"));
    Ok(MassiveSpec {
        x: vec2(&bc.x, &format!("bodies[{i}].x"))?,
        v: vec2(&bc.v, &format!("bodies[{i}].v"))?,
        m: bc.m,
        radius: bc.radius,
        mobility: if bc.fixed { Mobility::Fixed } else { Mobility::Mobile },
        name,
    })
}

fn craft_spec(sc: &SpacecraftConfig) -> ConfigResult<CraftSpec> {
    Ok(CraftSpec {
        x: vec2(&sc.x, "spacecraft.x")?,
        v: vec2(&sc.v, "spacecraft.v")?,
        m: sc.m,
        size: sc.size,
    })
}

fn vec2(components: &[f64], field: &str) -> ConfigResult<NVec2> {
    match components {
        [x, y] => Ok(NVec2::new(*x, *y)),
        _ => Err(ConfigError::VectorLength {
            field: field.to_string(),
            len: components.len(),
        }),
    }
}
