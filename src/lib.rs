pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;
pub mod error;

pub use simulation::states::{NVec2, BodyId, CraftId, Mobility, MassiveBody, DynamicBody};
pub use simulation::orbital::{OrbitalPos, SourceFrame, Direction};
pub use simulation::propagator::{Motion, Phase};
pub use simulation::params::Parameters;
pub use simulation::engine::Engine;
pub use simulation::world::{World, MassiveSpec, CraftSpec};
pub use simulation::scenario::{build_scenario, load_scenario};
pub use simulation::kepler::{solve_eccentric_anomaly, solve_hyperbolic_anomaly};

pub use configuration::config::{ParametersConfig, BodyConfig, SpacecraftConfig, ScenarioConfig};

pub use visualization::kepsim_vis2d::run_2d;

pub use benchmark::benchmark::bench_propagation;

pub use error::{ConfigError, ConfigResult};
