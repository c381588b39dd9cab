pub mod angle;
pub mod filter;
pub mod motion;
pub mod proximity;
pub mod regulator;
