// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("the product of the given primes does not match the modulus of the encryption key")]
    KeyConsistencyError,
    #[error("a modular inverse required by the key does not exist; the given primes are malformed")]
    NonInvertibleError,
    #[error("the following range error occurred: {0}")]
    RangeError(#[from] RangeError),
    #[error("the ciphertext is not associated with the encryption key of this decryption key")]
    NullKeyError,
    #[error("the following sanity-check error occurred: {0}")]
    SanityCheckError(SanityCheckError),
    #[error("an internal error that should never have happened and signifies a bug")]
    InternalError,
}

#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeError {
    #[error("ciphertext is not smaller than N^2")]
    CiphertextExceedsModulus,
    #[error("ciphertext is not co-prime to N")]
    CiphertextNotInvertible,
    #[error("plaintext is not smaller than N")]
    PlaintextExceedsModulus,
}

#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SanityCheckError {
    #[error("invalid Params")]
    InvalidParams(),
}

pub type Result<T> = std::result::Result<T, Error>;
