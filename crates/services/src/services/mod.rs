pub mod assistant;
pub mod email;
pub mod stats;
