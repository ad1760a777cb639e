// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

use crypto_bigint::modular::runtime_mod::{DynResidue, DynResidueParams};
use crypto_bigint::{Concat, Limb, NonZero, Uint};
use subtle::{ConstantTimeEq, CtOption};

use crate::{
    AsNaturalNumber, AsRingElement, Error, LargeBiPrimeSizedNumber, LargePrimeSizedNumber, Result,
};

/// Montgomery parameters for `modulus`, or none if `modulus` is even.
pub(crate) fn ring_params<const LIMBS: usize>(
    modulus: &Uint<LIMBS>,
) -> CtOption<DynResidueParams<LIMBS>> {
    #[allow(deprecated)]
    DynResidueParams::<LIMBS>::new_checked(modulus)
}

pub(crate) fn non_zero<const LIMBS: usize>(value: Uint<LIMBS>) -> Result<NonZero<Uint<LIMBS>>> {
    Option::from(NonZero::new(value)).ok_or(Error::InternalError)
}

/// Rounds a bit length up to whole limbs, so that bounded exponentiations by secret exponents
/// depend on the word count of the key rather than on the exact length of the exponent.
pub(crate) fn exponent_bound(bits: usize) -> usize {
    bits.div_ceil(Limb::BITS) * Limb::BITS
}

/// The Paillier $L$ function $ L(a, n) = \frac{a - 1}{n} $.
///
/// This is an exact integer division, defined only for $ a \equiv 1 \mod n $. For any $a$ which
/// does not satisfy this (zero included) the result is none.
pub(crate) fn l_function<const LIMBS: usize>(
    a: &Uint<LIMBS>,
    n: &NonZero<Uint<LIMBS>>,
) -> CtOption<Uint<LIMBS>> {
    let (quotient, remainder) = a.wrapping_sub(&Uint::ONE).div_rem(n);

    CtOption::new(
        quotient,
        !a.ct_eq(&Uint::ZERO) & remainder.ct_eq(&Uint::ZERO),
    )
}

/// The $H$ function $ H(a, n) = L(a, n)^{-1} \mod n $, where $ a = g^e \mod n^2 $ for the
/// generator $g$ and the group exponent $e$ of the modulus $n$ ($\lambda$ for $N$, $p-1$ and
/// $q-1$ for the primes).
///
/// `n` is given in the width of $n^2$, `n_params` in the width of $n$.
pub(crate) fn h_function<const LIMBS: usize, const WIDE_LIMBS: usize>(
    a: &Uint<WIDE_LIMBS>,
    n: &NonZero<Uint<WIDE_LIMBS>>,
    n_params: &DynResidueParams<LIMBS>,
) -> CtOption<Uint<LIMBS>> {
    l_function(a, n).and_then(|l| {
        let (inverse, is_invertible) = l.resize::<LIMBS>().as_ring_element(n_params).invert();

        CtOption::new(inverse.as_natural_number(), is_invertible.into())
    })
}

/// Computes $ L(c^e \mod n^2, n) \cdot h \mod n $, the decryption of `ciphertext` modulo $n$.
///
/// The raw path instantiates this with $ (N, \lambda, H_N) $ and the CRT path with
/// $ (p, p-1, H_p) $ and $ (q, q-1, H_q) $. The result is none iff `ciphertext` is not co-prime
/// to $n$.
pub(crate) fn decrypt_component<
    const LIMBS: usize,
    const WIDE_LIMBS: usize,
    const EXPONENT_LIMBS: usize,
>(
    ciphertext: &DynResidue<WIDE_LIMBS>,
    exponent: &Uint<EXPONENT_LIMBS>,
    exponent_bits: usize,
    n: &NonZero<Uint<WIDE_LIMBS>>,
    h: &Uint<LIMBS>,
    n_params: &DynResidueParams<LIMBS>,
) -> CtOption<Uint<LIMBS>> {
    let a = ciphertext
        .pow_bounded_exp(exponent, exponent_bits)
        .as_natural_number();

    l_function(&a, n).map(|l| {
        (l.resize::<LIMBS>().as_ring_element(n_params) * h.as_ring_element(n_params))
            .as_natural_number()
    })
}

/// Recombines $ m_p = m \mod p $ and $ m_q = m \mod q $ into $ m \mod pq $:
/// $ m = m_p + p \cdot ((m_q - m_p) \cdot p^{-1} \mod q) $.
pub(crate) fn crt_combine(
    mp: &LargePrimeSizedNumber,
    mq: &LargePrimeSizedNumber,
    p: &LargePrimeSizedNumber,
    p_inverse_mod_q: &LargePrimeSizedNumber,
    q_params: &DynResidueParams<{ LargePrimeSizedNumber::LIMBS }>,
) -> LargeBiPrimeSizedNumber {
    let u = ((mq.as_ring_element(q_params) - mp.as_ring_element(q_params))
        * p_inverse_mod_q.as_ring_element(q_params))
    .as_natural_number();

    // $ u < q $ so $ m_p + p \cdot u < pq $ and neither the product nor the sum can overflow.
    let (lo, hi) = p.mul_wide(&u);

    hi.concat(&lo).wrapping_add(&mp.resize())
}

/// Binary GCD. Variable time, so it must only run on key material once, at key construction.
pub(crate) fn gcd_vartime<const LIMBS: usize>(a: &Uint<LIMBS>, b: &Uint<LIMBS>) -> Uint<LIMBS> {
    let (mut a, mut b) = (*a, *b);

    if a == Uint::ZERO {
        return b;
    }
    if b == Uint::ZERO {
        return a;
    }

    let mut shift = 0;
    while is_even(&a) && is_even(&b) {
        a = a.shr_vartime(1);
        b = b.shr_vartime(1);
        shift += 1;
    }

    while is_even(&a) {
        a = a.shr_vartime(1);
    }

    loop {
        while is_even(&b) {
            b = b.shr_vartime(1);
        }

        if a > b {
            std::mem::swap(&mut a, &mut b);
        }

        b = b.wrapping_sub(&a);

        if b == Uint::ZERO {
            return a.shl_vartime(shift);
        }
    }
}

/// $ lcm(a, b) = \frac{a}{gcd(a, b)} \cdot b $, none if both are zero.
pub(crate) fn lcm_vartime(
    a: &LargePrimeSizedNumber,
    b: &LargePrimeSizedNumber,
) -> Option<LargeBiPrimeSizedNumber> {
    let gcd = Option::<NonZero<LargePrimeSizedNumber>>::from(NonZero::new(gcd_vartime(a, b)))?;
    let (lo, hi) = (*a / gcd).mul_wide(b);

    Some(hi.concat(&lo))
}

fn is_even<const LIMBS: usize>(x: &Uint<LIMBS>) -> bool {
    x.as_limbs()[0].0 & 1 == 0
}
