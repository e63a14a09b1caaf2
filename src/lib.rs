pub mod demo_feed;
pub mod export;
pub mod feed;
pub mod head_to_head;
pub mod http_cache;
pub mod http_client;
pub mod league_fetch;
pub mod persist;
pub mod snapshot;
pub mod standings;
pub mod state;
pub mod team_metrics;
