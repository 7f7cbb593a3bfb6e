// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod errors;
mod keystore;
mod wallet;
mod wallet_helpers;

pub use errors::*;
pub use keystore::*;
pub use wallet::*;
pub use wallet_helpers::*;
