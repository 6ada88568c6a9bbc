pub mod energy;
pub mod features;
pub mod segment;
pub mod stats;
