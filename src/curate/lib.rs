//! # Curate Architecture
//!
//! Curate is the editing core of a content console: FAQs, products, pricing
//! plans, blog posts and the like are kept as **manually ordered collections**
//! that editors add to, edit inline, search, page through and reorder by drag.
//! The CLI is one client of that core; a web or desktop UI would drive the
//! same [`api::CollectionEditor`].
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints, sets up logging                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One operation per module, returns CmdResult              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Editor Facade (api.rs)                                     │
//! │  - Session, drag, search window, notifications              │
//! │  - Stale references become logged no-ops                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collection Store (collection.rs)                           │
//! │  - Single writer, dense 1-based order per scope             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ MutationEvent (notify.rs)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait, FileStore, InMemoryStore, AutoSave sink │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering Invariants
//!
//! Within each scope (the root list, or the children of one parent) orders
//! are exactly `1..=N`. Every operation that changes membership or position
//! renumbers the affected scope and only that scope. Search and pagination
//! are views; they never touch order.
//!
//! ## Identities
//!
//! New records get a pending identity (`temp-<key>`) that survives reorders
//! and deletes of their neighbours, and is swapped for the persisted id once
//! storage reports one. See [`model`].
//!
//! ## No I/O in the Core
//!
//! Everything from [`api`] inward takes Rust values and returns Rust values.
//! It never prints and never exits. Persistence is a subscriber
//! ([`notify::MutationSink`]), not a call the core waits on.
//!
//! ## Module Overview
//!
//! - [`api`]: The editor facade
//! - [`collection`]: Ordered store and renumbering
//! - [`drag`]: Drag gesture to reorder request
//! - [`session`]: Inline add/edit form state
//! - [`filter`]: Search and pagination
//! - [`layout`]: Staged multi-move reordering
//! - [`notify`]: Auto-save notifications
//! - [`commands`]: CLI-level operations
//! - [`store`]: Storage abstraction and implementations
//! - [`model`], [`entities`], [`schema`]: Records, entity types and field rules
//! - [`index`]: Locators (`42`, `temp-…`, `@3`)
//! - [`config`], [`error`], [`slug`]
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod collection;
pub mod commands;
pub mod config;
pub mod drag;
pub mod entities;
pub mod error;
pub mod filter;
pub mod index;
pub mod layout;
pub mod model;
pub mod notify;
pub mod schema;
pub mod session;
pub mod slug;
pub mod store;
