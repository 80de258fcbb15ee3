pub mod application;
pub mod file;
pub mod listing;
pub mod resume;
pub mod screen;
pub mod user;
