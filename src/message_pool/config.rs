// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};

/// Config available for the [`super::MessagePool`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpoolConfig {
    /// Check that pushed messages were signed by their sender.
    pub verify_signatures: bool,
}

impl Default for MpoolConfig {
    fn default() -> Self {
        Self {
            verify_signatures: true,
        }
    }
}
