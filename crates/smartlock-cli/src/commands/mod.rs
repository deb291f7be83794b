pub mod daemon;
pub mod focus;
