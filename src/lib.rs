//! Interactive terminal task manager.
//!
//! The interactive core lives in [`tui::app`]: a pure state fold that turns
//! key presses and storage results into a new state plus at most one effect.
//! Storage sits behind [`service::TaskService`] and [`store::TaskStore`].

pub mod cli;
pub mod config;
pub mod dates;
pub mod logging;
pub mod service;
pub mod store;
pub mod task;

pub mod tui {
    pub mod app;
    pub mod effects;
    pub mod enums;
    pub mod input;
    pub mod list;
    pub mod render;
    pub mod run;
    pub mod task_form;
    pub mod theme;
    pub mod utils;
}
