pub mod auth_gate;
pub mod header;
pub mod results;
pub mod session_chip;
pub mod upload_section;
pub mod utils;
pub mod workbench;
