// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

/// Height of a tipset in the chain. The empty root tipset sits at epoch 0.
pub type ChainEpoch = i64;
