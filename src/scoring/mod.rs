pub mod aggregate;
pub mod fluency;
pub mod grammar;
pub mod professionalism;
pub mod similarity;
