// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::shim::address::Address;
use crate::utils::encoding::blake2b_256;
use anyhow::{Context as _, ensure};
use fvm_ipld_encoding::{de, ser, strict_bytes};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::borrow::Cow;

/// Length of a recoverable `secp256k1` signature: `r || s || v`.
pub const SECP_SIG_LEN: usize = 65;
/// Length of an uncompressed `secp256k1` public key.
pub const SECP_PUB_LEN: usize = 65;

/// A cryptographic signature, represented in bytes, of any key protocol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub sig_type: SignatureType,
    pub bytes: Vec<u8>,
}

impl ser::Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        strict_bytes::Serialize::serialize(&self.to_bytes(), serializer)
    }
}

impl<'de> de::Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let bytes: Cow<'de, [u8]> = strict_bytes::Deserialize::deserialize(deserializer)?;
        match bytes.split_first() {
            None => Err(de::Error::custom("Cannot deserialize empty bytes")),
            Some((&sig_byte, rest)) => {
                // Remove signature type byte
                let sig_type = SignatureType::from_u8(sig_byte).ok_or_else(|| {
                    de::Error::custom(format!(
                        "Invalid signature type byte (must be 1 or 2), was {sig_byte}"
                    ))
                })?;

                Ok(Signature {
                    bytes: rest.to_vec(),
                    sig_type,
                })
            }
        }
    }
}

impl Signature {
    /// Creates a SECP Signature given the raw bytes.
    pub fn new_secp256k1(bytes: Vec<u8>) -> Self {
        Self {
            sig_type: SignatureType::Secp256k1,
            bytes,
        }
    }

    /// Creates a BLS Signature given the raw bytes.
    pub fn new_bls(bytes: Vec<u8>) -> Self {
        Self {
            sig_type: SignatureType::Bls,
            bytes,
        }
    }

    /// Returns the signature bytes including the signature type byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.bytes.len() + 1);
        bytes.push(self.sig_type as u8);
        bytes.extend_from_slice(&self.bytes);
        bytes
    }

    pub fn signature_type(&self) -> SignatureType {
        self.sig_type
    }

    /// Returns `true` when no signature bytes are present.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Signature variants for Filecoin signatures.
#[derive(Clone, Debug, PartialEq, FromPrimitive, Copy, Eq, Hash, Default)]
#[repr(u8)]
pub enum SignatureType {
    #[default]
    Secp256k1 = 1,
    Bls = 2,
}

/// Produces signatures over encoded messages on behalf of an address.
pub trait Signer {
    /// Signs `data` with the key belonging to `address`.
    fn sign_bytes(&self, data: &[u8], address: &Address) -> anyhow::Result<Signature>;
}

/// Recovers the public key that produced a signature.
pub trait Recoverer {
    /// Returns the uncompressed public key that signed `data`.
    fn ecrecover(&self, data: &[u8], signature: &Signature) -> anyhow::Result<Vec<u8>>;
}

/// [`Recoverer`] for recoverable `secp256k1` signatures over the BLAKE2b-256
/// digest of the signed data.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1Recoverer;

impl Recoverer for Secp256k1Recoverer {
    fn ecrecover(&self, data: &[u8], signature: &Signature) -> anyhow::Result<Vec<u8>> {
        ensure!(
            signature.signature_type() == SignatureType::Secp256k1,
            "cannot recover a public key from a {:?} signature",
            signature.signature_type()
        );
        ecrecover(&blake2b_256(data), &signature.bytes)
    }
}

/// Recovers the uncompressed public key from a 65-byte `r || s || v`
/// signature over `hash`.
pub fn ecrecover(hash: &[u8; 32], signature: &[u8]) -> anyhow::Result<Vec<u8>> {
    ensure!(
        signature.len() == SECP_SIG_LEN,
        "invalid secp256k1 signature length {}, expected {SECP_SIG_LEN}",
        signature.len()
    );
    let (rs, v) = signature.split_at(SECP_SIG_LEN - 1);
    let sig = EcdsaSignature::from_slice(rs).context("malformed secp256k1 signature")?;
    let recovery_id = v
        .first()
        .copied()
        .and_then(RecoveryId::from_byte)
        .context("invalid secp256k1 recovery id")?;
    let key = VerifyingKey::recover_from_prehash(hash, &sig, recovery_id)
        .context("failed to recover secp256k1 public key")?;
    Ok(key.to_encoded_point(false).as_bytes().to_vec())
}
