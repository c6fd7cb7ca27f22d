//! PowerHell: a terminal tutor for PowerShell.
//!
//! The binary in `main.rs` owns the terminal; everything it drives lives here
//! so the state machine can be exercised without one.

pub mod app;
pub mod config;
pub mod content;
pub mod event;
pub mod logging;
pub mod menu;
pub mod state;
pub mod store;
pub mod ui;
pub mod views;
