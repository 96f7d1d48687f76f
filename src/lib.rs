//! This crate provides a client-side core for a calendar-based to-do list.
//!
//! The remote HTTP API is the system of record. It is reached through a typed [`client`] that can be used as a stand-alone module.
//!
//! Because a user-facing app wants to display a whole month at a glance, this crate also keeps an in-memory copy of every task, indexed by day, in a [`TodoStore`](store::TodoStore). \
//! The store mediates every mutation (create, delete, completion toggling, notification arming) and reconciles with the server when a remote call fails. \
//! A [`NotificationScanner`](notifications::NotificationScanner) periodically inspects the store for due notification timestamps and emits alerts. \
//! Both broadcast what happened on channels, so that a front-end can subscribe instead of polling.

pub mod traits;

pub mod error;
pub use error::Error;
mod task;
pub use task::Task;
pub mod store;
pub use store::TodoStore;
pub mod notifications;
pub use notifications::NotificationScanner;
pub mod search;
pub use search::SearchService;

pub mod client;
pub use client::Client;
pub mod calendar;

pub mod config;
pub mod utils;
