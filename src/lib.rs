// Library surface for the binary and the headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod range;
pub mod runtime;
pub mod score;
pub mod storage;
pub mod timer;
pub mod ui;
pub mod util;

pub use app::{App, AppState};
pub use error::{Error, Result};
