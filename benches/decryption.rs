use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use crypto_bigint::{NonZero, RandomMod};
use paillier_crt::test_exports::{N, P, Q};
use paillier_crt::{Batch, DecryptionKey, EncryptionKey, LargeBiPrimeSizedNumber};
use rand_core::OsRng;
use std::time::Duration;

pub fn decryption_benches(c: &mut Criterion) {
    let mut g = c.benchmark_group("decryption benches");

    let encryption_key = EncryptionKey::new(N).unwrap();
    let decryption_key = DecryptionKey::new(&encryption_key, P, Q).unwrap();
    let n = NonZero::new(N).unwrap();

    let encrypt_batch = || {
        Batch::new(std::array::from_fn(|_| {
            encryption_key.encrypt(
                &LargeBiPrimeSizedNumber::random_mod(&mut OsRng, &n),
                &LargeBiPrimeSizedNumber::random_mod(&mut OsRng, &n),
            )
        }))
    };

    g.bench_function("benchmark decrypt_raw() of a 2048-bit key", |bench| {
        bench.iter_batched(
            encrypt_batch,
            |ciphertexts| decryption_key.decrypt_raw(&ciphertexts),
            BatchSize::SmallInput,
        );
    });

    g.bench_function("benchmark decrypt_crt() of a 2048-bit key", |bench| {
        bench.iter_batched(
            encrypt_batch,
            |ciphertexts| decryption_key.decrypt_crt(&ciphertexts),
            BatchSize::SmallInput,
        );
    });

    g.bench_function("benchmark DecryptionKey::new() of a 2048-bit key", |bench| {
        bench.iter(|| DecryptionKey::new(&encryption_key, P, Q));
    });

    g.finish();
}

criterion_group! {
  name = benches;
  config = Criterion::default().measurement_time(Duration::from_secs(10));
  targets = decryption_benches
}

criterion_main!(benches);
