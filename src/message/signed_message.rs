// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Error, Message as MessageTrait};
use crate::shim::message::MethodNum;
use crate::shim::{
    address::{Address, address_from_public_key},
    crypto::{Recoverer, Signature, Signer},
    econ::TokenAmount,
    message::Message,
};
use crate::utils::cid::CidCborExt;
use cid::Cid;
use fvm_ipld_encoding::tuple::*;

/// Represents a wrapped message with signature bytes.
///
/// A `SignedMessage` is immutable: signing happens once, in
/// [`SignedMessage::new`], and the parts are only exposed by reference.
#[derive(PartialEq, Clone, Debug, Serialize_tuple, Deserialize_tuple, Hash, Eq)]
pub struct SignedMessage {
    message: Message,
    signature: Signature,
}

impl SignedMessage {
    /// Signs the canonical encoding of `message` with the key of its `from`
    /// address.
    pub fn new(message: Message, signer: &impl Signer) -> Result<SignedMessage, Error> {
        let bytes = message
            .marshal_cbor()
            .map_err(|e| Error::Encoding(e.to_string()))?;
        let signature = signer
            .sign_bytes(&bytes, &message.from)
            .map_err(Error::Signing)?;
        Ok(SignedMessage { message, signature })
    }

    /// Generate a new signed message from fields.
    /// The signature will not be verified.
    pub fn new_unchecked(message: Message, signature: Signature) -> SignedMessage {
        SignedMessage { message, signature }
    }

    /// Returns reference to the unsigned message.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Returns signature of the signed message.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Canonical `dag-cbor` encoding of the message together with its
    /// signature.
    pub fn marshal_cbor(&self) -> Result<Vec<u8>, Error> {
        fvm_ipld_encoding::to_vec(self).map_err(|e| Error::Encoding(e.to_string()))
    }

    /// Decodes a signed message from its canonical encoding.
    pub fn unmarshal_cbor(bytes: &[u8]) -> Result<SignedMessage, Error> {
        fvm_ipld_encoding::from_slice(bytes).map_err(|e| Error::Decoding(e.to_string()))
    }

    /// Content identifier of the signed message: the BLAKE2b-256 `dag-cbor`
    /// CID of message and signature together.
    pub fn cid(&self) -> Result<Cid, Error> {
        Cid::from_cbor_blake2b256(self).map_err(|e| Error::Encoding(e.to_string()))
    }

    /// Recovers the address of the key that produced the signature. This does
    /// not consult the `from` field.
    pub fn recover_address(&self, recoverer: &impl Recoverer) -> Result<Address, Error> {
        if self.signature.is_empty() {
            return Err(Error::Unsigned);
        }
        let bytes = self
            .message
            .marshal_cbor()
            .map_err(|e| Error::Encoding(e.to_string()))?;
        let public_key = recoverer
            .ecrecover(&bytes, &self.signature)
            .map_err(Error::Recovery)?;
        address_from_public_key(&public_key).map_err(|e| Error::Recovery(e.into()))
    }

    /// Verifies that the from address of the message generated the signature.
    pub fn verify(&self, recoverer: &impl Recoverer) -> Result<(), Error> {
        let signer = self.recover_address(recoverer)?;
        if signer != self.message.from {
            return Err(Error::Recovery(anyhow::anyhow!(
                "message claims sender {} but was signed by {signer}",
                self.message.from
            )));
        }
        Ok(())
    }
}

impl MessageTrait for SignedMessage {
    fn from(&self) -> Address {
        self.message.from()
    }
    fn to(&self) -> Address {
        self.message.to()
    }
    fn sequence(&self) -> u64 {
        self.message.sequence()
    }
    fn value(&self) -> TokenAmount {
        self.message.value()
    }
    fn method_num(&self) -> MethodNum {
        self.message.method_num
    }
}
