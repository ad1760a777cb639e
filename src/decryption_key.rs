// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

use std::fmt;

use crypto_bigint::Concat;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::precomputed_values::{CrtPrecomputedValues, RawPrecomputedValues};
use crate::{
    Batch, CiphertextBatch, EncryptionKey, Error, LargeBiPrimeSizedNumber, LargePrimeSizedNumber,
    PaillierModulusSizedNumber, RangeError, Result,
};

/// A Paillier private key, associated with the [`EncryptionKey`] it decrypts for.
///
/// Both the CRT and the direct decryption constants are computed once, at construction, so
/// that switching between the two algorithms never requires re-keying. CRT is enabled by
/// default.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DecryptionKey<'a> {
    #[zeroize(skip)]
    encryption_key: &'a EncryptionKey,
    raw: RawPrecomputedValues,
    crt: CrtPrecomputedValues,
    crt_enabled: bool,
}

impl<'a> DecryptionKey<'a> {
    /// Instantiates the key of the primes `p` and `q` of the modulus of `encryption_key`,
    /// precomputing all decryption constants.
    ///
    /// Fails with [`Error::KeyConsistencyError`] unless `p` and `q` are distinct, greater than
    /// one and $ p \cdot q = N $, and with [`Error::NonInvertibleError`] if any of the
    /// constants does not exist, which signifies that `p` or `q` is not prime or that the
    /// order of the generator is not a multiple of $N$.
    pub fn new(
        encryption_key: &'a EncryptionKey,
        p: LargePrimeSizedNumber,
        q: LargePrimeSizedNumber,
    ) -> Result<DecryptionKey<'a>> {
        if p == q || p <= LargePrimeSizedNumber::ONE || q <= LargePrimeSizedNumber::ONE {
            return Err(Error::KeyConsistencyError);
        }

        let (lo, hi) = p.mul_wide(&q);
        if hi.concat(&lo) != *encryption_key.n() {
            return Err(Error::KeyConsistencyError);
        }

        let crt = CrtPrecomputedValues::new(p, q, encryption_key.g())?;
        let raw = RawPrecomputedValues::new(
            encryption_key,
            &crt.p.prime_minus_one,
            &crt.q.prime_minus_one,
        )?;

        debug!(bits = encryption_key.bits(), "precomputed decryption key");

        Ok(DecryptionKey {
            encryption_key,
            raw,
            crt,
            crt_enabled: true,
        })
    }

    /// Selects the algorithm used by [`Self::decrypt`].
    pub fn enable_crt(&mut self, enabled: bool) {
        debug!(enabled, "toggled CRT decryption");

        self.crt_enabled = enabled;
    }

    pub fn is_crt_enabled(&self) -> bool {
        self.crt_enabled
    }

    /// Decrypts every lane of `ciphertexts` with the algorithm currently selected by
    /// [`Self::enable_crt`].
    ///
    /// Each lane is decrypted independently and reports its own result: a lane holding a
    /// ciphertext which is not smaller than $N^2$ ([`RangeError::CiphertextExceedsModulus`]) or
    /// not co-prime to $N$ ([`RangeError::CiphertextNotInvertible`]) fails on its own, leaving
    /// the other lanes decrypted. Use [`Batch::transpose`] to fail the batch as a whole.
    pub fn decrypt(
        &self,
        ciphertexts: &Batch<PaillierModulusSizedNumber>,
    ) -> Result<Batch<Result<LargeBiPrimeSizedNumber>>> {
        self.decrypt_lanes(ciphertexts, self.crt_enabled)
    }

    /// Decrypts `ciphertexts` modulo $p$ and $q$ separately and recombines the results.
    pub fn decrypt_crt(
        &self,
        ciphertexts: &Batch<PaillierModulusSizedNumber>,
    ) -> Result<Batch<Result<LargeBiPrimeSizedNumber>>> {
        self.decrypt_lanes(ciphertexts, true)
    }

    /// Decrypts `ciphertexts` directly, as $ L(c^\lambda \mod N^2, N) \cdot H_N \mod N $.
    pub fn decrypt_raw(
        &self,
        ciphertexts: &Batch<PaillierModulusSizedNumber>,
    ) -> Result<Batch<Result<LargeBiPrimeSizedNumber>>> {
        self.decrypt_lanes(ciphertexts, false)
    }

    /// Decrypts the ciphertexts of `encrypted` as [`Self::decrypt`] does, failing with
    /// [`Error::NullKeyError`] if it was not encrypted under the key of this decryption key.
    pub fn decrypt_encrypted_number(
        &self,
        encrypted: &impl CiphertextBatch,
    ) -> Result<Batch<Result<LargeBiPrimeSizedNumber>>> {
        if encrypted.encryption_key() != self.encryption_key {
            return Err(Error::NullKeyError);
        }

        self.decrypt(encrypted.ciphertexts())
    }

    fn decrypt_lanes(
        &self,
        ciphertexts: &Batch<PaillierModulusSizedNumber>,
        crt: bool,
    ) -> Result<Batch<Result<LargeBiPrimeSizedNumber>>> {
        ciphertexts.map_lanes(|lane, ciphertext| {
            let plaintext = self.decrypt_lane(ciphertext, crt);

            if let Err(error) = &plaintext {
                debug!(lane, %error, crt, "failed to decrypt lane");
            }

            plaintext
        })
    }

    fn decrypt_lane(
        &self,
        ciphertext: &PaillierModulusSizedNumber,
        crt: bool,
    ) -> Result<LargeBiPrimeSizedNumber> {
        if ciphertext >= self.encryption_key.n2() {
            return Err(RangeError::CiphertextExceedsModulus.into());
        }

        let plaintext = if crt {
            self.crt.decrypt(ciphertext)?
        } else {
            self.raw.decrypt(self.encryption_key, ciphertext)?
        };
        let plaintext: LargeBiPrimeSizedNumber =
            Option::from(plaintext).ok_or(RangeError::CiphertextNotInvertible)?;

        if &plaintext >= self.n() {
            return Err(RangeError::PlaintextExceedsModulus.into());
        }

        Ok(plaintext)
    }

    pub fn n(&self) -> &LargeBiPrimeSizedNumber {
        self.encryption_key.n()
    }

    pub fn p(&self) -> &LargePrimeSizedNumber {
        &self.crt.p.prime
    }

    pub fn q(&self) -> &LargePrimeSizedNumber {
        &self.crt.q.prime
    }

    /// $ \lambda = lcm(p-1, q-1) $
    pub fn lambda(&self) -> &LargeBiPrimeSizedNumber {
        &self.raw.lambda
    }

    /// The bit length of $N$.
    pub fn bits(&self) -> usize {
        self.encryption_key.bits()
    }

    pub fn encryption_key(&self) -> &'a EncryptionKey {
        self.encryption_key
    }
}

impl fmt::Debug for DecryptionKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptionKey")
            .field("bits", &self.bits())
            .field("crt_enabled", &self.crt_enabled)
            .field("encryption_key", self.encryption_key)
            .finish_non_exhaustive()
    }
}
