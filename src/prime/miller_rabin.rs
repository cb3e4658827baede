//! Miller-Rabin 概率素性测试

use num_bigint_dig::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::RngCore;

// 先用小素数试除，快速排除大部分合数
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97,
];

/// 判断 `n` 是否（很可能）为素数。
///
/// 每一轮从 `[2, n-2]` 中均匀选取一个见证数；合数通过单轮测试的概率不超过 1/4，
/// 因此 `rounds` 轮后的误判概率不超过 4^-rounds。
pub fn is_probable_prime<R: RngCore + ?Sized>(n: &BigUint, rounds: usize, rng: &mut R) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    for &p in SMALL_PRIMES.iter() {
        if n == &BigUint::from(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }

    // n - 1 = d * 2^s，d 为奇数
    let n_minus_one = n - &one;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    // 见证数取值范围的宽度：[2, n-2] 共 n-3 个数
    let witness_span = n - 3u32;

    'witness: for _ in 0..rounds {
        let a = random_below(&witness_span, rng) + &two;
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
            if x == one {
                return false;
            }
        }
        return false;
    }
    true
}

/// 拒绝采样出 `[0, bound)` 内的均匀随机整数，`bound` 必须大于 0
fn random_below<R: RngCore + ?Sized>(bound: &BigUint, rng: &mut R) -> BigUint {
    let bits = bound.bits();
    let num_bytes = bits.div_ceil(8);
    let excess_bits = num_bytes * 8 - bits;
    let mut buf = vec![0u8; num_bytes];
    loop {
        rng.fill_bytes(&mut buf);
        buf[0] &= 0xffu8 >> excess_bits;
        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    fn check(n: u64) -> bool {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        is_probable_prime(&BigUint::from(n), 64, &mut rng)
    }

    fn brute_force_is_prime(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        let mut i = 2;
        while i * i <= n {
            if n % i == 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    #[test]
    fn test_small_numbers_match_brute_force() {
        for n in 0..2000u64 {
            assert_eq!(check(n), brute_force_is_prime(n), "n = {}", n);
        }
    }

    #[test]
    fn test_known_primes() {
        for p in [65537u64, 1_000_003, 2_305_843_009_213_693_951] {
            assert!(check(p), "{} should be prime", p);
        }
        let mersenne_127 = (BigUint::one() << 127usize) - 1u32;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(is_probable_prime(&mersenne_127, 64, &mut rng));
    }

    #[test]
    fn test_carmichael_numbers_are_composite() {
        for n in [561u64, 1105, 1729, 41041, 825_265, 321_197_185] {
            assert!(!check(n), "{} is a Carmichael number", n);
        }
    }

    #[test]
    fn test_semiprime_is_composite() {
        assert!(!check(1_000_003 * 1_000_033));
        let p = (BigUint::one() << 127usize) - 1u32;
        let q = (BigUint::one() << 61usize) - 1u32;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(!is_probable_prime(&(p * q), 64, &mut rng));
    }

    #[test]
    fn test_random_below_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let bound = BigUint::from(1000u32);
        for _ in 0..500 {
            assert!(random_below(&bound, &mut rng) < bound);
        }
        let one = BigUint::one();
        assert!(random_below(&one, &mut rng).is_zero());
    }
}
