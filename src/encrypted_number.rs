// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

use crate::{Batch, EncryptionKey, PaillierModulusSizedNumber};

/// A batch of ciphertexts bound to the encryption key under which they were produced.
pub trait CiphertextBatch {
    fn encryption_key(&self) -> &EncryptionKey;

    fn ciphertexts(&self) -> &Batch<PaillierModulusSizedNumber>;
}

/// A batch of encrypted (fixed-point) numbers sharing a single key and exponent.
///
/// Only the ciphertexts take part in decryption; the `exponent` is carried along for the
/// caller to decode the decrypted plaintexts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedNumber<'a> {
    encryption_key: &'a EncryptionKey,
    ciphertexts: Batch<PaillierModulusSizedNumber>,
    exponent: i32,
}

impl<'a> EncryptedNumber<'a> {
    pub fn new(
        encryption_key: &'a EncryptionKey,
        ciphertexts: Batch<PaillierModulusSizedNumber>,
        exponent: i32,
    ) -> Self {
        EncryptedNumber {
            encryption_key,
            ciphertexts,
            exponent,
        }
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }
}

impl CiphertextBatch for EncryptedNumber<'_> {
    fn encryption_key(&self) -> &EncryptionKey {
        self.encryption_key
    }

    fn ciphertexts(&self) -> &Batch<PaillierModulusSizedNumber> {
        &self.ciphertexts
    }
}
