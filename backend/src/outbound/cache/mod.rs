//! Distributed cache adapters.
//!
//! The Redis adapter pools connections with `bb8-redis` and stores partner
//! menu listings as JSON under `menu:partner:<id>` keys.

mod redis_partner_menu_cache;

pub use redis_partner_menu_cache::{RedisCacheConfig, RedisPartnerMenuCache};
