pub mod astronomy;
pub mod projection;
pub mod time;
