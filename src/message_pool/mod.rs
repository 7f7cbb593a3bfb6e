// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT
mod config;
mod errors;
mod metrics;
mod msgpool;

pub use self::{
    config::*,
    errors::*,
    msgpool::{msg_pool::MessagePool, *},
};
