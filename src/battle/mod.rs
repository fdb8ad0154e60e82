pub mod calculators;
pub mod catch;
pub mod engine;
pub mod state;
pub mod turn_orchestrator;

#[cfg(test)]
pub(crate) mod tests;
