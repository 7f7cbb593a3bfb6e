// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Filecoin message pool: pending signed messages, deduplicated by content
//! identifier, kept consistent with the canonical chain as its head moves.

pub mod blocks;
pub mod chain;
pub mod config;
pub mod db;
pub mod key_management;
pub mod logger;
pub mod message;
pub mod message_pool;
pub mod metrics;
pub mod shim;
#[cfg(test)]
mod test_utils;
pub mod utils;

pub use crate::{
    blocks::{Tipset, TipsetKey},
    chain::{ChainStore, HeadChange},
    config::Config,
    message::SignedMessage,
    message_pool::{MessagePool, MpoolConfig, update_message_pool},
};
