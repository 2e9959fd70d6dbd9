pub mod config;
pub mod fixtures;
pub mod mock_analyst;
pub mod radar;
pub mod state;
pub mod video;
