pub mod frame;
pub mod state;
pub mod view;
