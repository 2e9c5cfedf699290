pub mod batch;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod pool;
pub mod sampler;
pub mod simulation;
pub mod weights;

pub use config::SimulationConfig;
pub use error::{LotteryError, Result};
pub use models::{Participant, ParticipantId, RunReport, RunResult, Winner};
pub use simulation::{run_simulation, simulate};
