pub mod baseline;
pub mod evaluator;
pub mod normalize;
