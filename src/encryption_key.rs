// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

use crypto_bigint::modular::runtime_mod::DynResidueParams;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    arithmetic::ring_params, error::SanityCheckError, AsRingElement, Error,
    LargeBiPrimeSizedNumber, PaillierModulusSizedNumber, PaillierRingElement,
};
#[cfg(any(test, feature = "test_exports"))]
use crate::AsNaturalNumber;

/// The Paillier public key $ (N, g) $, with $N^2$ and the Montgomery parameters of both moduli
/// precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionKey {
    n: LargeBiPrimeSizedNumber,
    n2: PaillierModulusSizedNumber,
    g: PaillierModulusSizedNumber,
    bits: usize,
    n_params: DynResidueParams<{ LargeBiPrimeSizedNumber::LIMBS }>,
    n2_params: DynResidueParams<{ PaillierModulusSizedNumber::LIMBS }>,
}

impl EncryptionKey {
    /// Instantiates the key of the modulus `n` with the standard generator $ g = N + 1 $.
    pub fn new(n: LargeBiPrimeSizedNumber) -> crate::Result<EncryptionKey> {
        let g = n
            .resize::<{ PaillierModulusSizedNumber::LIMBS }>()
            .wrapping_add(&PaillierModulusSizedNumber::ONE);

        Self::new_with_generator(n, g)
    }

    /// Instantiates the key of the modulus `n` with the generator `g`, which must be an element
    /// of $\mathbb{Z}_{N^2}^*$. Whether the order of `g` is a multiple of $N$ can only be checked
    /// knowing the factorization, and so it is left to [`crate::DecryptionKey::new`].
    pub fn new_with_generator(
        n: LargeBiPrimeSizedNumber,
        g: PaillierModulusSizedNumber,
    ) -> crate::Result<EncryptionKey> {
        let invalid_params = Error::SanityCheckError(SanityCheckError::InvalidParams());

        // Montgomery form only works for odd moduli, which is also what we expect from a
        // product of two large primes.
        if n <= LargeBiPrimeSizedNumber::ONE {
            return Err(invalid_params);
        }
        let n_params = Option::from(ring_params(&n)).ok_or(invalid_params.clone())?;

        let n2: PaillierModulusSizedNumber = n.square();
        let n2_params = Option::from(ring_params(&n2)).ok_or(invalid_params.clone())?;

        if g == PaillierModulusSizedNumber::ZERO || g >= n2 {
            return Err(invalid_params);
        }

        let g_mod_n2: PaillierRingElement = g.as_ring_element(&n2_params);
        let (_, is_invertible) = g_mod_n2.invert();
        if !bool::from(is_invertible) {
            return Err(invalid_params);
        }

        Ok(EncryptionKey {
            n,
            n2,
            g,
            bits: n.bits_vartime(),
            n_params,
            n2_params,
        })
    }

    pub fn n(&self) -> &LargeBiPrimeSizedNumber {
        &self.n
    }

    pub fn n2(&self) -> &PaillierModulusSizedNumber {
        &self.n2
    }

    pub fn g(&self) -> &PaillierModulusSizedNumber {
        &self.g
    }

    /// The bit length of $N$.
    pub fn bits(&self) -> usize {
        self.bits
    }

    pub(crate) fn n_params(&self) -> &DynResidueParams<{ LargeBiPrimeSizedNumber::LIMBS }> {
        &self.n_params
    }

    pub(crate) fn n2_params(&self) -> &DynResidueParams<{ PaillierModulusSizedNumber::LIMBS }> {
        &self.n2_params
    }
}

#[cfg(any(test, feature = "test_exports"))]
impl EncryptionKey {
    /// Encrypts `plaintext` with the given `randomness`: $ c = g^m \cdot r^N \mod N^2 $.
    pub fn encrypt(
        &self,
        plaintext: &LargeBiPrimeSizedNumber,
        randomness: &LargeBiPrimeSizedNumber,
    ) -> PaillierModulusSizedNumber {
        let n = self.n.resize::<{ PaillierModulusSizedNumber::LIMBS }>();
        let r: PaillierRingElement = randomness
            .resize::<{ PaillierModulusSizedNumber::LIMBS }>()
            .as_ring_element(&self.n2_params);

        let g_to_the_m = if self.g == n.wrapping_add(&PaillierModulusSizedNumber::ONE) {
            // $ (1 + N)^m = 1 + m*N \mod N^2 $
            plaintext
                .resize::<{ PaillierModulusSizedNumber::LIMBS }>()
                .as_ring_element(&self.n2_params)
                * n.as_ring_element(&self.n2_params)
                + PaillierRingElement::one(self.n2_params)
        } else {
            self.g
                .as_ring_element(&self.n2_params)
                .pow_bounded_exp(plaintext, self.bits)
        };

        (g_to_the_m * r.pow_bounded_exp(&self.n, self.bits)).as_natural_number()
    }
}

#[derive(Serialize, Deserialize)]
struct SerializedEncryptionKey {
    n: LargeBiPrimeSizedNumber,
    g: PaillierModulusSizedNumber,
}

impl Serialize for EncryptionKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        SerializedEncryptionKey {
            n: self.n,
            g: self.g,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EncryptionKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let SerializedEncryptionKey { n, g } = SerializedEncryptionKey::deserialize(deserializer)?;

        EncryptionKey::new_with_generator(n, g).map_err(D::Error::custom)
    }
}
