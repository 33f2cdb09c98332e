pub mod api;
pub mod homeassistant;
pub mod state_file;
