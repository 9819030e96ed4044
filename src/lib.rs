// src/lib.rs

//! Jackpot watcher library.
//!
//! Checks a lottery's published next-draw jackpot estimate against a
//! threshold and sends a single Telegram alert per draw.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
