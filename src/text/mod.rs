pub mod align;
pub mod normalize;
