// Registration core: validation, eligibility screening, session approval,
// fee calculation.

pub mod evaluator;
pub mod fee;
pub mod policy;
pub mod screening;
pub mod speaker;
