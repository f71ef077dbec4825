pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod kepler;
pub mod orbital;
pub mod propagator;
pub mod world;
pub mod scenario;
