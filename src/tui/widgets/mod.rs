// TUI widget modules for each dashboard panel.

pub mod player_card;
pub mod projections;
pub mod quit_confirm;
pub mod scoring;
pub mod season_stats;
pub mod selector;
pub mod status_bar;
