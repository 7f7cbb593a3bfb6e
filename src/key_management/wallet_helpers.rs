// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::errors::Error;
use crate::shim::{
    address::Address,
    crypto::{SECP_SIG_LEN, Signature, SignatureType},
};
use crate::utils::encoding::blake2b_256;
use k256::ecdsa::SigningKey;
use rand::{CryptoRng, RngCore};

fn secp_key(private_key: &[u8]) -> Result<SigningKey, Error> {
    SigningKey::from_slice(private_key).map_err(|err| Error::Other(err.to_string()))
}

/// Return the public key for a given private key and `SignatureType`
pub fn to_public(sig_type: SignatureType, private_key: &[u8]) -> Result<Vec<u8>, Error> {
    match sig_type {
        SignatureType::Secp256k1 => Ok(secp_key(private_key)?
            .verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()),
        SignatureType::Bls => Err(Error::UnsupportedKeyType(sig_type)),
    }
}

/// Return a new Address that is of a given `SignatureType` and uses the
/// supplied public key
pub fn new_address(sig_type: SignatureType, public_key: &[u8]) -> Result<Address, Error> {
    match sig_type {
        SignatureType::Secp256k1 => {
            Address::new_secp256k1(public_key).map_err(|err| Error::Other(err.to_string()))
        }
        SignatureType::Bls => Err(Error::UnsupportedKeyType(sig_type)),
    }
}

/// Signs the BLAKE2b-256 digest of `msg`, returning a recoverable
/// `r || s || v` signature.
pub fn sign(sig_type: SignatureType, private_key: &[u8], msg: &[u8]) -> Result<Signature, Error> {
    match sig_type {
        SignatureType::Secp256k1 => {
            let key = secp_key(private_key)?;
            let msg_hash = blake2b_256(msg);
            let (sig, recovery_id) = key
                .sign_prehash_recoverable(&msg_hash)
                .map_err(|err| Error::Other(err.to_string()))?;
            let mut new_bytes = [0; SECP_SIG_LEN];
            new_bytes[..SECP_SIG_LEN - 1].copy_from_slice(&sig.to_bytes());
            new_bytes[SECP_SIG_LEN - 1] = recovery_id.to_byte();
            Ok(Signature::new_secp256k1(new_bytes.to_vec()))
        }
        SignatureType::Bls => Err(Error::UnsupportedKeyType(sig_type)),
    }
}

/// Generate a new private key
pub fn generate<R>(sig_type: SignatureType, rng: &mut R) -> Result<Vec<u8>, Error>
where
    R: CryptoRng + RngCore,
{
    match sig_type {
        SignatureType::Secp256k1 => Ok(SigningKey::random(rng).to_bytes().to_vec()),
        SignatureType::Bls => Err(Error::UnsupportedKeyType(sig_type)),
    }
}
