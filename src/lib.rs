//! DSA Coach - a daily data-structures and algorithms practice companion
//!
//! DSA Coach picks a problem of the day from a weekly curriculum, asks a
//! hosted language model for hints and code reviews, and keeps track of
//! points, levels, streaks, badges and weak topics.

pub mod app;
pub mod catalog;
pub mod coach;
pub mod config;
pub mod error;
pub mod learning;
pub mod theme;
pub mod ui;

pub use app::App;
pub use app::session::Session;
pub use config::Config;
pub use error::Error;
pub use theme::Theme;
