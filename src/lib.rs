pub mod bootstrap;
pub mod cards;
pub mod config;
pub mod decoder;
pub mod fake_feed;
pub mod feed;
pub mod http_cache;
pub mod http_client;
pub mod info_fetch;
pub mod page;
pub mod render;
pub mod roster_fetch;
pub mod state;
pub mod tally;
