mod layout;
mod notifications;
mod project_list;
mod report_view;
mod run_panel;
mod status_bar;
pub mod theme;

pub use layout::draw;
