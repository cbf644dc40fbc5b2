pub mod classical_element;
pub mod config;
pub mod constants;
pub mod env_state;
pub mod geometry;
pub mod n2yo;
pub mod orbitrack;
pub mod orbitrack_errors;
pub mod propagator;
pub mod sampler;
pub mod time;
pub mod tle;

pub use config::OrbitrackConfig;
pub use orbitrack::Orbitrack;
pub use orbitrack_errors::OrbitrackError;
