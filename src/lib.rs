pub mod ai;
pub mod combat;
pub mod config;
pub mod display;
pub mod entities;
pub mod input;
pub mod level;
pub mod pages;
pub mod powerups;
pub mod screens;
pub mod session;
