// Domain layer - Pure models and policies
pub mod decimation;
pub mod errors;
pub mod telemetry;
pub mod viewport;
