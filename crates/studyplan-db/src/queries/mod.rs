pub mod cycle_cursors;
pub mod daily_plans;
pub mod executed_days;
pub mod generation_logs;
pub mod projections;
