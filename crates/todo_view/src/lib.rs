pub mod api;
pub mod cli;
pub mod tui;
pub mod view;
