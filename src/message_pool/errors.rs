// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;

/// `MessagePool` error.
#[derive(Debug, Error)]
pub enum Error {
    /// The content identifier of a message could not be computed.
    #[error("failed to compute message identity: {0}")]
    Identity(#[source] crate::message::Error),
    /// A tipset, block or message could not be resolved from the store while
    /// reconciling the pool with a new head.
    #[error("failed to resolve chain: {0:#}")]
    ChainResolution(#[source] anyhow::Error),
    /// The message signature does not belong to its sender.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}
