//! WhatsApp log monitor - lifecycle events from the leveldb log.

pub mod config;
pub mod monitor;
