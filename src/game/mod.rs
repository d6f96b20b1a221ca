pub mod assets;
pub mod board;
pub mod picker;
pub mod timer;
pub mod turn;
