// Scheduling core: phase calculation, prediction and plan generation

pub mod cycle_history;
pub mod cycle_predictor;
pub mod fitness_plan_scheduler;
pub mod lunar_oracle;
pub mod phase_calculator;
pub mod race_training_planner;

pub use cycle_history::CycleHistory;
pub use cycle_predictor::CyclePredictor;
pub use fitness_plan_scheduler::{allocate_day_types, FitnessPlanScheduler};
pub use lunar_oracle::{LunarPhaseOracle, MoonPhaseName, SynodicMoonOracle};
pub use phase_calculator::PhaseCalculator;
pub use race_training_planner::RaceTrainingPlanner;
