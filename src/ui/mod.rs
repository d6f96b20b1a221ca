pub mod app;
mod board;
mod chart;
mod dialogs;
mod hud;
mod paint;
mod scene;
mod state;
