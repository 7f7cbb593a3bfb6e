// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use derive_builder::Builder;
use fvm_ipld_encoding::{RawBytes, de::Deserializer, ser::Serializer};
use serde::{Deserialize, Serialize};

use crate::shim::{address::Address, econ::TokenAmount};

/// Method number indicator for calling actor methods.
pub type MethodNum = u64;

/// Method number of a plain value transfer.
pub const METHOD_SEND: MethodNum = 0;

/// An unsigned Filecoin message. Equality of two messages is equality of
/// their canonical CBOR encodings, which covers every field.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Builder)]
#[builder(name = "MessageBuilder")]
pub struct Message {
    #[builder(default)]
    pub version: u64,
    pub from: Address,
    pub to: Address,
    #[builder(default)]
    pub sequence: u64,
    #[builder(default)]
    pub value: TokenAmount,
    #[builder(default = "METHOD_SEND")]
    pub method_num: MethodNum,
    #[builder(default)]
    pub params: RawBytes,
    #[builder(default)]
    pub gas_limit: u64,
    #[builder(default)]
    pub gas_fee_cap: TokenAmount,
    #[builder(default)]
    pub gas_premium: TokenAmount,
}

impl Message {
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    /// Creates a new Message to transfer an amount of FIL specified in the `value` field.
    pub fn transfer(from: Address, to: Address, sequence: u64, value: TokenAmount) -> Self {
        Message {
            version: 0,
            from,
            to,
            sequence,
            value,
            method_num: METHOD_SEND,
            params: RawBytes::default(),
            gas_limit: 0,
            gas_fee_cap: TokenAmount::default(),
            gas_premium: TokenAmount::default(),
        }
    }

    /// Canonical DAG-CBOR encoding. This is the payload a signer signs.
    pub fn marshal_cbor(&self) -> Result<Vec<u8>, fvm_ipld_encoding::Error> {
        fvm_ipld_encoding::to_vec(self)
    }
}

impl Serialize for Message {
    fn serialize<S>(&self, s: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (
            &self.version,
            &self.to,
            &self.from,
            &self.sequence,
            &self.value,
            &self.gas_limit,
            &self.gas_fee_cap,
            &self.gas_premium,
            &self.method_num,
            &self.params,
        )
            .serialize(s)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (
            version,
            to,
            from,
            sequence,
            value,
            gas_limit,
            gas_fee_cap,
            gas_premium,
            method_num,
            params,
        ) = Deserialize::deserialize(deserializer)?;
        Ok(Self {
            version,
            from,
            to,
            sequence,
            value,
            method_num,
            params,
            gas_limit,
            gas_fee_cap,
            gas_premium,
        })
    }
}
