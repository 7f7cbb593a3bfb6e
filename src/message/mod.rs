// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod signed_message;

use crate::shim::message::MethodNum;
use crate::shim::{address::Address, econ::TokenAmount, message::Message as ShimMessage};
pub use signed_message::SignedMessage;
use thiserror::Error;

/// Message interface to interact with Signed and unsigned messages in a generic
/// context.
pub trait Message {
    /// Returns the from address of the message.
    fn from(&self) -> Address;
    /// Returns the destination address of the message.
    fn to(&self) -> Address;
    /// Returns the message sequence or nonce.
    fn sequence(&self) -> u64;
    /// Returns the amount sent in message.
    fn value(&self) -> TokenAmount;
    /// Returns the method number to be called.
    fn method_num(&self) -> MethodNum;
}

impl Message for ShimMessage {
    fn from(&self) -> Address {
        self.from
    }
    fn to(&self) -> Address {
        self.to
    }
    fn sequence(&self) -> u64 {
        self.sequence
    }
    fn value(&self) -> TokenAmount {
        self.value.clone()
    }
    fn method_num(&self) -> MethodNum {
        self.method_num
    }
}

/// Errors raised while encoding, signing or authenticating messages.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to encode message: {0}")]
    Encoding(String),
    #[error("failed to decode signed message: {0}")]
    Decoding(String),
    #[error("failed to sign message")]
    Signing(#[source] anyhow::Error),
    #[error("failed to recover signer")]
    Recovery(#[source] anyhow::Error),
    #[error("message does not contain a signature")]
    Unsigned,
}
