pub mod appearance;
pub mod hash;
pub mod milky_way;
pub mod pulse;
pub mod render;
pub mod rng;
pub mod vector;
