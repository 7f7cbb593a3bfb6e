// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod address;
pub mod clock;
pub mod crypto;
pub mod econ;
pub mod message;

mod fvm_shared_latest {
    pub use fvm_shared4::*;
}
