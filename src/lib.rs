// Author: dWallet Labs, Ltd.
// SPDX-License-Identifier: BSD-3-Clause-Clear

use crypto_bigint::modular::runtime_mod::{DynResidue, DynResidueParams};
use crypto_bigint::{Concat, Uint, U2048};

pub use batch::{Batch, BATCH_SIZE};
pub use decryption_key::DecryptionKey;
pub use encrypted_number::{CiphertextBatch, EncryptedNumber};
pub use encryption_key::EncryptionKey;
pub use error::{Error, RangeError, Result, SanityCheckError};

mod arithmetic;
mod batch;
mod decryption_key;
mod encrypted_number;
mod encryption_key;
mod error;
mod precomputed_values;

/* Types & Trait (impls) around `crypto_bigint` */

/// Sized to hold the primes $p, q$ of the largest supported (4096-bit) modulus.
pub type LargePrimeSizedNumber = U2048;
/// Sized to hold $N = pq$, and with it plaintexts, $\lambda$, $p^2$ and $q^2$.
pub type LargeBiPrimeSizedNumber = <LargePrimeSizedNumber as Concat>::Output;
/// Sized to hold $N^2$, and with it ciphertexts and the generator $g$.
pub type PaillierModulusSizedNumber = <LargeBiPrimeSizedNumber as Concat>::Output;

pub(crate) type PaillierRingElement = DynResidue<{ PaillierModulusSizedNumber::LIMBS }>;

pub(crate) trait AsNaturalNumber<const LIMBS: usize> {
    fn as_natural_number(&self) -> Uint<LIMBS>;
}

pub(crate) trait AsRingElement<const LIMBS: usize> {
    fn as_ring_element(&self, params: &DynResidueParams<LIMBS>) -> DynResidue<LIMBS>;
}

impl<const LIMBS: usize> AsNaturalNumber<LIMBS> for DynResidue<LIMBS> {
    fn as_natural_number(&self) -> Uint<LIMBS> {
        self.retrieve()
    }
}

impl<const LIMBS: usize> AsRingElement<LIMBS> for Uint<LIMBS> {
    fn as_ring_element(&self, params: &DynResidueParams<LIMBS>) -> DynResidue<LIMBS> {
        DynResidue::new(self, *params)
    }
}

#[cfg(any(test, feature = "test_exports"))]
pub mod test_exports {
    use crypto_bigint::rand_core::CryptoRngCore;

    use super::*;

    // The toy key $p = 61$, $q = 53$.
    pub const TOY_P: LargePrimeSizedNumber = LargePrimeSizedNumber::from_u64(61);
    pub const TOY_Q: LargePrimeSizedNumber = LargePrimeSizedNumber::from_u64(53);
    pub const TOY_N: LargeBiPrimeSizedNumber = LargeBiPrimeSizedNumber::from_u64(3233);

    // A 2048-bit key, and an encryption of `PLAINTEXT` under it with $g = N + 1$.
    pub const P: LargePrimeSizedNumber = LargePrimeSizedNumber::from_be_hex("0000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000CC89553A220E291C0A77B78D1DD9A5811CF1F7D42EBD4F98F0431FFF9940FFF646DC4BA482F68520A308BAA91D65B3C87052E43A9F1494215B4E9A9740A58D2F4A65BD54D366395AA599D1C1110717B97FCDFAEA4C557B90214941DA64FE614417D9F21980932A7453BCA4587F78D7D0109C220B8F3C2C544F12D1FF0BD86695");
    pub const Q: LargePrimeSizedNumber = LargePrimeSizedNumber::from_be_hex("0000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000C1A2BA8AB0489A0B456AE2F6E359C1C0397D9D122ACED875CE8C93550120063616EC1075CB57FE3B5A2ACE973AA1A24CC09705A5ACA6D7B1AEA98EE80469F3739E8839720A6C5E820DB9C09CEB85D44BDAA6783D3E1613A83EAA09905FFF6D58C934485A890C2A6E353E67499EB4FAAACB5529C1902F4E94CB9AB8A1A0D8CBCD");
    pub const N: LargeBiPrimeSizedNumber = LargeBiPrimeSizedNumber::from_be_hex("000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000009AB58D335942D4545B88C6437139F59D81CC83042E6E4E01829A50BDF1DBD65727892E0EFD1705FB51E567C0E7F35FD4E73F372CEF720D64039777E6B75BE7EF6F558FF517CAD617F6A47C7D1E071E5064A3D76E82D5F954D7065A69A62DC94A56C20ED9222E1C213A98E3869E5215DAF81418D3439E70E6C1C3B0C4E08101D569FDFFF132D6CAA1B21A1991D275A5B52F0A474A1B8B4796B1B254F59EBF3F9569922298639285274CB3C8D855389167FFD4E3AA5A46CFEB47798368B9A8E53DDEDAA1F4B52034EC24F0DFA1A25C3DE5246A87860701C23051AC525E85EED68F911B4B3DA607C5B3ABF0FEB2EED4C01A2DD312D5C433A4EBAEA64209C35A4C51");
    pub const LAMBDA: LargeBiPrimeSizedNumber = LargeBiPrimeSizedNumber::from_be_hex("0000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000026AD634CD650B51516E23190DC4E7D67607320C10B9B938060A6942F7C76F595C9E24B83BF45C17ED47959F039FCD7F539CFCDCB3BDC835900E5DDF9ADD6F9FBDBD563FD45F2B585FDA91F1F4781C7941928F5DBA0B57E5535C1969A698B725295B083B6488B87084EA638E1A7948576BE050634D0E79C39B070EC3138204074F6F47C0B182001DE988DDFC374508F9CF626AC98F07FC7E1FCB8A86841178E5A42F2719F85510072D3E00FE5FF4C4ED4B3BABE7283A2D9060F60567A5D265926BD7B2ACB75D36743DC675350E973D477F27D85179F258CBDFC6E41BCF03C41FCAC034432671A1C3448BD7CC43429BB67D47871C229320A80A4FE2DDA45AA467C");
    pub const PLAINTEXT: LargeBiPrimeSizedNumber = LargeBiPrimeSizedNumber::from_be_hex("00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000973F0E49F4DA050714BA51E1D2A124018F840CD7214CC4811B940AC5B5E47F93F8A9655E6E001B1D2BF6BFF06549B310D228E371ED135C41B5781A46A60269B19D7AE5F7272E656C1C113571B22909ADAAB628237F066C368EBC5DC51554578F9CAF3BBEEE9AE3E9DA865A92DFA6FE3083C3A8AD0DC0863229DFAE0D304A88EFF6C8BFCA86B89E044D2E99CBFB4C6CCF3CA2AB1FB3E39E3A75905515D92B8903054EFFD9601AADE0479738DE5290D10E500FD8B66C06A4519543250E5A14AD62B40C8C0591F741D41AE78BC10D3EDCA2B077F398CFC4574C9354B52A3A33D812327F960EA2BA9AA472427AD328A52E3E2E2F473A93D92A8D33CCFA549DFA54D5");
    pub const RANDOMNESS: LargeBiPrimeSizedNumber = LargeBiPrimeSizedNumber::from_be_hex("000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000008B357DA21DFFED94459272374C21506E85FC61D15FD653E8FC5631958E14D66C7CBBA66C528207E68B8DBFE5259A6DB77C6FF3F9AADEDD399C614B6CD871256C6B44DADA005B411D66ACF7F9F6C257261C35D3F99FE37DCFF637CB2390D5BC4161CD86A6C576981B9E38F41D5865C8FE32F9BB4F4B741484E8A87F69D68F4EDEF0667E0627C597D2F8AE897B98615FA672AD3FF9C51FF04F115301923ABDFFF703C26A6F0C57572AB2B60A11BD7596D2BE49B6782C629C405B0CC5C2AF200F71F064D9A3CDFF7813AEEFE8AA915A2D38B1558F2F1C013B14E76E7EA3D9ADAF84A805C0B46D2793034857501D1E5FB3291C2B04450510656302817710BFCC67C0");
    pub const CIPHERTEXT: PaillierModulusSizedNumber = PaillierModulusSizedNumber::from_be_hex("000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000044A7D7CBA5C8B14DED55604BC16D4DAAE0371EC6344E2CD71B3616491B6BB0D0F851EBC9BEE0C88CC10117DC70A3C8AD5F8A1B5FAB1142C08801EEF5D2A6D55B51FF2D19CBE0663DBF45CF3565A5E4C43E15E09EDE576568FDDF819A08A046F0EE27AF2EEB415132817130BED9FC7DD4E96E200800BF4CEDFEC28C0F82D5B62B463121EE7EFEEF24BB13F6B6A29AF1768DF05EAF2CAEFC56D91178F306183F1E94C5404CF0B476F1CBCFEFA594C5693804CF8554F15A98092C8220095716B61EAFDB998B917E084DF9BE58ACA63C572A5E18B4C6506519719A3ED167B5A460E42C1BEAE77E8DE2E67F342FC394FA8D611CCB43294E3D3BB3976D00F88B5D3F5C807B4F358C5988AC47BF981322FFF9777CDC412018DBBE9FA8C7DB274361B720BD0195B66690BB2F4E9B91282EA57E27E6764285E65DED35F43229894BC31363A877FED6F170F7A6CECA46EE13C7ADFBD7A831B8A936398A48A048964287CAE7FE50385D167F4CB53DAA834DF80BCF35B78FA18481E35F5EAD11416050C7839B81E88923C20A465A36805497EB1BCA7F959FC97127030C776E95DFEF230E5BA66699A08A3BF0212EC6147EECD3A10E007B1E1B4D0011BE4233F974FE75D0DEC9F9832A4B16930590971B57F68ED4560D032CBFEC0C1BE09DB4B9B8053B67FCFB4D240EEEE090A65C3F83AB657663BB78090367BEE74A1A93A0AEEDDACA073B09");

    // A 4096-bit key.
    pub const LARGE_P: LargePrimeSizedNumber = LargePrimeSizedNumber::from_be_hex("F3C7E451F105D437147C14D0CD1CCBAE115A673B404FD1D81C18B6EBD0327A9E638FEBAF7770E4C1121096E3F7AD2E9B7132BD31AB7D862A0ACA7F4C09BDF5668E1C718DEC43E99D70A1DB32735FA58B5D54422B144E0DDFCCEDD0E0C53821BBDCDD96A6DC101DF96E923E49D5892725EEA9220597E8C2D509A474F61B2A3EB7F15F76EEB89F0D9CBBA8A30297F4849CB41FA436F048D2DA8D7F9248921803A348E201D2C12F933B5D6565EEA4DDA3C7D89614B1CEF5BBB2B85A525A5260364B5E13FFFA3836EC19F6C0105B5BA2B4E34C7785E058F9F56284EBCC099C7CD729F0F3A6F66277CAD952CB5D7908D4215BBA4CF2BCB48B31059593E6772ECA8869");
    pub const LARGE_Q: LargePrimeSizedNumber = LargePrimeSizedNumber::from_be_hex("EE18FDEB678164481AFF8F17A068AD40C4E4590504EDE99B12EA3F8BC15396EEB58BBDE9D0A551C220938C1AA4CAC8E5685209E39C5D9E2FD9F2420C099079526E554F4F6FE73BDDE375BC1AFACEFF6F91DD78ECB4CCC3D212D72E750AC2A324BE7F7FAD11F65C893BE1361C6B0BDDC182F7BB43569638C3702BCB78D4C8A05267D29A0A081924FFD31D802300EC815A81A2C84F0FAED89A6BA8E3D7A65A7A7BE7E4E72B4B71A018B8EF43E36D106F28A47C70FB43FBC7F5249EEA0350DA8EFA85AC3CAE3CF477DF802CC46A969C43B1DD56A0C5BE38D6DF96AD34813B0C7D216E23D0E94B45C27F50058896D5CD341CFCB55964F1149EF8C54766E77D852123");
    pub const LARGE_N: LargeBiPrimeSizedNumber = LargeBiPrimeSizedNumber::from_be_hex("E2BBA2CE4D763A57E1AB33DE929F7B1404A660C4ECD69838BC3EDB41F9D0FF360E4989D68AE0B3126606FCE9B4019B371D866F1914FB7959027E389D8C86A8152455F184FFCC68D1A03B6CBE2242ACFC588D9CBD23E22FA11745B43292E5D2C8E3D5F7BE883498862A720A42CD91BC0A2B3D7EBB129ECDD3CCC4645B2FC37D153CBC9414D76778D82634484E206BFA8B80088DD230563A783A8D659056B114769F570FFA8CC605CA8110247F539FA105DBC452CB27E268BACAE227CB0626248853FBD40CD7C8F7186A68DEC80B6394797248ED6E9DA21E61C086240697681B6AB1945F32D8ED8363A3DD8AF1E80031CA6B17AE334F2B6BB9BABF479791E585C6DDFDF05CE4F9D9044A0D7C2AACABA79BE916E05FACEE2241BECC11E873D41E2BE9B277DF05EEC124D002286A733F097CE8A0F54CB6FD13820DA1C438566ACD08FA74789A84B03A57EFD455E5B8EE165CEA3A7E736E069E680E9278FA09C5E558D40E9C8AAE3F1DB991E5A46D439143FAA78104D7DF63E7D7F874AC964290D85A9A606FADACA2A9E14978792202EBEE56CAC5D91ADA153EC11752361B2391CA1712C0A666DDC96361E4427B0DF0BDF229684E0396FD3AF162C9C6B25A6756667E9228971E739FB1623F51FFC3A6BE6C97DF041D5AC4331A75AC8592877A1E904894E0849EA78077FBC8C661F0D6DB2A9FCA71F6EC303A9476FEEBFFE6A4D32F5B");

    /// Samples two distinct primes of `prime_bits` bits each, returning $ (p, q, N = pq) $.
    pub fn generate_primes(
        prime_bits: usize,
        rng: &mut impl CryptoRngCore,
    ) -> (
        LargePrimeSizedNumber,
        LargePrimeSizedNumber,
        LargeBiPrimeSizedNumber,
    ) {
        let p: LargePrimeSizedNumber = crypto_primes::generate_prime_with_rng(rng, Some(prime_bits));

        loop {
            let q: LargePrimeSizedNumber =
                crypto_primes::generate_prime_with_rng(rng, Some(prime_bits));

            if q != p {
                let (lo, hi) = p.mul_wide(&q);

                return (p, q, hi.concat(&lo));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crypto_bigint::Split;
    use rand_core::OsRng;
    use rstest::rstest;

    use super::test_exports::*;
    use super::*;
    use crate::arithmetic::ring_params;

    #[test]
    fn as_ring_element_and_as_natural_number_circles_correctly() {
        let n2 = N.square();
        let params = ring_params(&n2).unwrap();

        assert_eq!(CIPHERTEXT.as_ring_element(&params).as_natural_number(), CIPHERTEXT);
    }

    #[test]
    fn test_vectors_are_consistent() {
        assert_eq!(P.mul_wide(&Q), (N.split().1, N.split().0));
        assert_eq!(LARGE_P.mul_wide(&LARGE_Q), (LARGE_N.split().1, LARGE_N.split().0));

        assert_eq!(N.bits_vartime(), 2048);
        assert_eq!(LARGE_N.bits_vartime(), 4096);
        assert_eq!(TOY_N, LargeBiPrimeSizedNumber::from(61u64 * 53));
    }

    #[rstest]
    #[case(32)]
    #[case(64)]
    #[case(128)]
    fn generates_primes(#[case] prime_bits: usize) {
        let (p, q, n) = generate_primes(prime_bits, &mut OsRng);

        assert_ne!(p, q);
        assert_eq!(p.bits_vartime(), prime_bits);
        assert_eq!(q.bits_vartime(), prime_bits);

        let (lo, hi) = p.mul_wide(&q);
        assert_eq!(hi.concat(&lo), n);
    }
}
