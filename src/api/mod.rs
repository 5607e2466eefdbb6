pub mod health;
pub mod panel;
pub mod render;
pub mod swagger;
pub mod users;
