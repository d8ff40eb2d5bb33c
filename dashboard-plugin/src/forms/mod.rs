//! Field layouts of the plugin forms, one module per plugin.

pub mod api_breaker;
pub mod basic_auth;
pub mod limit_conn;
pub mod proxy_mirror;
pub mod referer_restriction;
