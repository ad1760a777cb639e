// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

use crypto_bigint::modular::runtime_mod::DynResidueParams;
use subtle::{Choice, CtOption};
use zeroize::Zeroize;

use crate::arithmetic::{
    crt_combine, decrypt_component, exponent_bound, h_function, lcm_vartime, non_zero, ring_params,
};
use crate::{
    AsNaturalNumber, AsRingElement, EncryptionKey, Error, LargeBiPrimeSizedNumber,
    LargePrimeSizedNumber, PaillierModulusSizedNumber, Result,
};

/// The constants of the direct decryption $ m = L(c^\lambda \mod N^2, N) \cdot H_N \mod N $.
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub(crate) struct RawPrecomputedValues {
    // $ \lambda = lcm(p-1, q-1) $
    pub(crate) lambda: LargeBiPrimeSizedNumber,
    // $ H_N = L(g^\lambda \mod N^2, N)^{-1} \mod N $
    pub(crate) hn: LargeBiPrimeSizedNumber,
    // Bounds the exponentiation by $\lambda$ to the word count of $N$ rather than to the exact
    // (secret) length of $\lambda$.
    pub(crate) exponent_bits: usize,
}

impl RawPrecomputedValues {
    pub(crate) fn new(
        encryption_key: &EncryptionKey,
        p_minus_one: &LargePrimeSizedNumber,
        q_minus_one: &LargePrimeSizedNumber,
    ) -> Result<RawPrecomputedValues> {
        let lambda = lcm_vartime(p_minus_one, q_minus_one).ok_or(Error::NonInvertibleError)?;
        let exponent_bits = exponent_bound(encryption_key.bits());

        let g_to_the_lambda = encryption_key
            .g()
            .as_ring_element(encryption_key.n2_params())
            .pow_bounded_exp(&lambda, exponent_bits)
            .as_natural_number();

        let hn = Option::from(h_function(
            &g_to_the_lambda,
            &non_zero(encryption_key.n().resize::<{ PaillierModulusSizedNumber::LIMBS }>())?,
            encryption_key.n_params(),
        ))
        .ok_or(Error::NonInvertibleError)?;

        Ok(RawPrecomputedValues {
            lambda,
            hn,
            exponent_bits,
        })
    }

    /// Decrypts `ciphertext`, which must be smaller than $N^2$. None iff `ciphertext` is not
    /// co-prime to $N$.
    pub(crate) fn decrypt(
        &self,
        encryption_key: &EncryptionKey,
        ciphertext: &PaillierModulusSizedNumber,
    ) -> Result<CtOption<LargeBiPrimeSizedNumber>> {
        Ok(decrypt_component(
            &ciphertext.as_ring_element(encryption_key.n2_params()),
            &self.lambda,
            self.exponent_bits,
            &non_zero(encryption_key.n().resize::<{ PaillierModulusSizedNumber::LIMBS }>())?,
            &self.hn,
            encryption_key.n_params(),
        ))
    }
}

/// The constants of decryption modulo a single prime factor $p$ of $N$:
/// $ m_p = L(c^{p-1} \mod p^2, p) \cdot H_p \mod p $.
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub(crate) struct PrimeComponent {
    pub(crate) prime: LargePrimeSizedNumber,
    pub(crate) prime_minus_one: LargePrimeSizedNumber,
    pub(crate) prime_squared: LargeBiPrimeSizedNumber,
    // $ H_p = L(g^{p-1} \mod p^2, p)^{-1} \mod p $
    pub(crate) h: LargePrimeSizedNumber,
    pub(crate) exponent_bits: usize,
    // TODO: zeroize the Montgomery parameters once `DynResidueParams` implements `Zeroize`
    #[zeroize(skip)]
    pub(crate) params: DynResidueParams<{ LargePrimeSizedNumber::LIMBS }>,
    #[zeroize(skip)]
    pub(crate) squared_params: DynResidueParams<{ LargeBiPrimeSizedNumber::LIMBS }>,
}

impl PrimeComponent {
    fn new(
        prime: LargePrimeSizedNumber,
        generator: &PaillierModulusSizedNumber,
    ) -> Result<PrimeComponent> {
        let prime_minus_one = prime.wrapping_sub(&LargePrimeSizedNumber::ONE);
        let prime_squared: LargeBiPrimeSizedNumber = prime.square();

        let params = Option::from(ring_params(&prime)).ok_or(Error::NonInvertibleError)?;
        let squared_params =
            Option::from(ring_params(&prime_squared)).ok_or(Error::NonInvertibleError)?;
        let exponent_bits = exponent_bound(prime.bits_vartime());

        let g_to_the_prime_minus_one = reduce(generator, &prime_squared)?
            .as_ring_element(&squared_params)
            .pow_bounded_exp(&prime_minus_one, exponent_bits)
            .as_natural_number();

        let h = Option::from(h_function(
            &g_to_the_prime_minus_one,
            &non_zero(prime.resize::<{ LargeBiPrimeSizedNumber::LIMBS }>())?,
            &params,
        ))
        .ok_or(Error::NonInvertibleError)?;

        Ok(PrimeComponent {
            prime,
            prime_minus_one,
            prime_squared,
            h,
            exponent_bits,
            params,
            squared_params,
        })
    }

    fn decrypt(
        &self,
        ciphertext: &PaillierModulusSizedNumber,
    ) -> Result<CtOption<LargePrimeSizedNumber>> {
        Ok(decrypt_component(
            &reduce(ciphertext, &self.prime_squared)?.as_ring_element(&self.squared_params),
            &self.prime_minus_one,
            self.exponent_bits,
            &non_zero(self.prime.resize::<{ LargeBiPrimeSizedNumber::LIMBS }>())?,
            &self.h,
            &self.params,
        ))
    }
}

/// The constants of the CRT decryption, which decrypts modulo $p$ and $q$ separately over
/// half-sized operands and recombines the results.
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub(crate) struct CrtPrecomputedValues {
    pub(crate) p: PrimeComponent,
    pub(crate) q: PrimeComponent,
    pub(crate) p_inverse_mod_q: LargePrimeSizedNumber,
}

impl CrtPrecomputedValues {
    pub(crate) fn new(
        p: LargePrimeSizedNumber,
        q: LargePrimeSizedNumber,
        generator: &PaillierModulusSizedNumber,
    ) -> Result<CrtPrecomputedValues> {
        let p = PrimeComponent::new(p, generator)?;
        let q = PrimeComponent::new(q, generator)?;

        let (p_inverse_mod_q, is_invertible) = p.prime.as_ring_element(&q.params).invert();
        let p_inverse_mod_q = Option::from(CtOption::new(
            p_inverse_mod_q.as_natural_number(),
            Choice::from(is_invertible),
        ))
        .ok_or(Error::NonInvertibleError)?;

        Ok(CrtPrecomputedValues {
            p,
            q,
            p_inverse_mod_q,
        })
    }

    /// Decrypts `ciphertext` modulo $p$ and $q$ and recombines the results modulo $N$. None iff
    /// `ciphertext` is not co-prime to $N$.
    pub(crate) fn decrypt(
        &self,
        ciphertext: &PaillierModulusSizedNumber,
    ) -> Result<CtOption<LargeBiPrimeSizedNumber>> {
        let mp = self.p.decrypt(ciphertext)?;
        let mq = self.q.decrypt(ciphertext)?;

        Ok(mp.and_then(|mp| {
            mq.map(|mq| {
                crt_combine(
                    &mp,
                    &mq,
                    &self.p.prime,
                    &self.p_inverse_mod_q,
                    &self.q.params,
                )
            })
        }))
    }
}

/// $ x \mod m $, for a modulus $m$ in the width of $N$.
fn reduce(
    x: &PaillierModulusSizedNumber,
    modulus: &LargeBiPrimeSizedNumber,
) -> Result<LargeBiPrimeSizedNumber> {
    let modulus = non_zero(modulus.resize::<{ PaillierModulusSizedNumber::LIMBS }>())?;

    Ok(x.rem(&modulus).resize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_exports::{LAMBDA, N, P, Q, TOY_N, TOY_P, TOY_Q};

    #[test]
    fn precomputes_raw_values() {
        let encryption_key = EncryptionKey::new(TOY_N).unwrap();

        let raw = RawPrecomputedValues::new(
            &encryption_key,
            &LargePrimeSizedNumber::from(60u64),
            &LargePrimeSizedNumber::from(52u64),
        )
        .unwrap();

        assert_eq!(raw.lambda, LargeBiPrimeSizedNumber::from(780u64));
        assert_eq!(raw.hn, LargeBiPrimeSizedNumber::from(1173u64));
    }

    #[test]
    fn precomputes_crt_values() {
        let encryption_key = EncryptionKey::new(TOY_N).unwrap();

        let crt = CrtPrecomputedValues::new(TOY_P, TOY_Q, encryption_key.g()).unwrap();

        assert_eq!(crt.p.prime_minus_one, LargePrimeSizedNumber::from(60u64));
        assert_eq!(crt.q.prime_minus_one, LargePrimeSizedNumber::from(52u64));
        assert_eq!(crt.p.prime_squared, LargeBiPrimeSizedNumber::from(3721u64));
        assert_eq!(crt.q.prime_squared, LargeBiPrimeSizedNumber::from(2809u64));
        assert_eq!(crt.p.h, LargePrimeSizedNumber::from(23u64));
        assert_eq!(crt.q.h, LargePrimeSizedNumber::from(33u64));
        assert_eq!(crt.p_inverse_mod_q, LargePrimeSizedNumber::from(20u64));
    }

    #[test]
    fn precomputes_lambda_of_large_key() {
        let encryption_key = EncryptionKey::new(N).unwrap();
        let one = LargePrimeSizedNumber::ONE;

        let raw = RawPrecomputedValues::new(
            &encryption_key,
            &P.wrapping_sub(&one),
            &Q.wrapping_sub(&one),
        )
        .unwrap();

        assert_eq!(raw.lambda, LAMBDA);
    }

    #[test]
    fn fails_on_generator_of_order_co_prime_to_n() {
        // $ g = 2^N \mod N^2 $ is an $N$-th residue, so $ L(g^\lambda \mod N^2, N) = 0 $.
        let encryption_key = EncryptionKey::new_with_generator(
            TOY_N,
            PaillierModulusSizedNumber::from(2295359u64),
        )
        .unwrap();

        assert!(matches!(
            RawPrecomputedValues::new(
                &encryption_key,
                &LargePrimeSizedNumber::from(60u64),
                &LargePrimeSizedNumber::from(52u64),
            ),
            Err(Error::NonInvertibleError)
        ));
        assert!(matches!(
            CrtPrecomputedValues::new(TOY_P, TOY_Q, encryption_key.g()),
            Err(Error::NonInvertibleError)
        ));
    }

    #[test]
    fn crt_and_raw_decrypt_alike() {
        let encryption_key = EncryptionKey::new(TOY_N).unwrap();
        let raw = RawPrecomputedValues::new(
            &encryption_key,
            &LargePrimeSizedNumber::from(60u64),
            &LargePrimeSizedNumber::from(52u64),
        )
        .unwrap();
        let crt = CrtPrecomputedValues::new(TOY_P, TOY_Q, encryption_key.g()).unwrap();

        let ciphertext = PaillierModulusSizedNumber::from(2741887u64);
        let expected = Some(LargeBiPrimeSizedNumber::from(65u64));

        let plaintext: Option<_> = raw.decrypt(&encryption_key, &ciphertext).unwrap().into();
        assert_eq!(plaintext, expected);

        let plaintext: Option<_> = crt.decrypt(&ciphertext).unwrap().into();
        assert_eq!(plaintext, expected);

        // Multiples of $p$ are not in $\mathbb{Z}_{N^2}^*$.
        let ciphertext = PaillierModulusSizedNumber::from(61u64 * 1000);
        assert!(bool::from(
            raw.decrypt(&encryption_key, &ciphertext).unwrap().is_none()
        ));
        assert!(bool::from(crt.decrypt(&ciphertext).unwrap().is_none()));
    }
}
