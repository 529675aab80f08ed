mod app;
mod board;
mod colors;
mod input;
mod panels;
mod settings_form;

pub use app::OverlayApp;
