//! Асинхронный рантайм: один tokio-таск на стол.

pub mod table_actor;

pub use table_actor::{spawn_table, TableActor, TableHandle, TableMessage};
