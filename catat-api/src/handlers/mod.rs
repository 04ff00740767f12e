pub mod generate;
pub mod normalize;
pub mod service;
