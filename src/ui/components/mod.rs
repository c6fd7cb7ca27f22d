pub mod account_form;
pub mod dashboard;
pub mod explorer;
pub mod field;
pub mod help;
pub mod intro;
pub mod lesson;
pub mod menu_panel;
pub mod progress_bar;
pub mod sign_in;
