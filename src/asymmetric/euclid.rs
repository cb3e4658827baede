//! 扩展欧几里得算法：由 (PhiN, e) 求私钥指数 d，使 e·d ≡ 1 (mod PhiN)
//!
//! 正向过程记录每一步的 (a, b, 商)，反向过程沿记录回代，
//! 交替更新两个 (值, 系数) 对，始终保持 `值A·系数A + 值B·系数B == 1`。

use crate::common::errors::{Error, Result};
use num_bigint_dig::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// 正向过程中记录的一步：a = quotient·b + (a mod b)
#[derive(Clone, Debug, PartialEq, Eq)]
struct EuclidStep {
    a: BigInt,
    b: BigInt,
    quotient: BigInt,
}

#[derive(Clone, Debug)]
struct Term {
    value: BigInt,
    coefficient: BigInt,
}

/// 求 e 在模 PhiN 下的逆元，结果落在 `[0, PhiN)` 内。
///
/// `PhiN < 2`、`e < 2` 或 `e >= PhiN` 时返回 `InvalidArgument`；
/// 若 gcd(PhiN, e) != 1（包括 e 整除 PhiN 的情况）则返回 `Logic`。
pub fn find_private_exponent(phi_n: &BigInt, e: &BigInt) -> Result<BigInt> {
    let two = BigInt::from(2u32);
    if phi_n < &two || e < &two || e >= phi_n {
        return Err(Error::invalid_argument(
            "extended Euclid needs 2 <= e < PhiN",
        ));
    }

    let steps = forward_pass(phi_n, e)?;
    let d = backward_pass(steps, phi_n, e)? % phi_n;
    if d.is_negative() {
        Ok(d + phi_n)
    } else {
        Ok(d)
    }
}

fn forward_pass(phi_n: &BigInt, e: &BigInt) -> Result<Vec<EuclidStep>> {
    let mut steps = Vec::new();
    let mut a = phi_n.clone();
    let mut b = e.clone();
    loop {
        let (quotient, remainder) = a.div_rem(&b);
        if remainder.is_zero() {
            break;
        }
        steps.push(EuclidStep {
            a: a.clone(),
            b: b.clone(),
            quotient,
        });
        a = b;
        b = remainder;
    }

    if steps.is_empty() {
        return Err(Error::logic("extended Euclid produced no steps"));
    }
    // 循环结束时 b 即 gcd(PhiN, e)
    if !b.is_one() {
        return Err(Error::logic("PhiN and e are not coprime"));
    }
    Ok(steps)
}

/// 回代，返回 e 的系数（尚未取模）
fn backward_pass(mut steps: Vec<EuclidStep>, phi_n: &BigInt, e: &BigInt) -> Result<BigInt> {
    let last = steps
        .pop()
        .ok_or_else(|| Error::logic("extended Euclid has no step to unwind"))?;

    // 最后一步的余数就是 gcd：1 = a·1 + b·(-q)
    let mut first = Term {
        value: last.a,
        coefficient: BigInt::one(),
    };
    let mut second = Term {
        value: last.b,
        coefficient: -last.quotient,
    };
    let mut second_is_smaller = true;

    while let Some(step) = steps.pop() {
        if second_is_smaller {
            first.coefficient += &second.coefficient * -&step.quotient;
            second.value = step.a;
        } else {
            second.coefficient += &first.coefficient * -&step.quotient;
            first.value = step.a;
        }
        second_is_smaller = !second_is_smaller;
    }

    let combination = &first.value * &first.coefficient + &second.value * &second.coefficient;
    if !combination.is_one() {
        return Err(Error::logic(
            "Bezout identity does not hold after unwinding",
        ));
    }

    let (smaller, larger) = if second_is_smaller {
        (second, first)
    } else {
        (first, second)
    };
    if &smaller.value != e || &larger.value != phi_n {
        return Err(Error::logic("extended Euclid unwound to the wrong pair"));
    }
    Ok(smaller.coefficient)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d_for(phi_n: u64, e: u64) -> Result<BigInt> {
        find_private_exponent(&BigInt::from(phi_n), &BigInt::from(e))
    }

    #[test]
    fn test_textbook_values() {
        assert_eq!(d_for(3120, 17).unwrap(), BigInt::from(2753u32));
        assert_eq!(d_for(10, 3).unwrap(), BigInt::from(7u32));
    }

    #[test]
    fn test_result_is_inverse_in_range() {
        for (phi_n, e) in [
            (40u64, 7u64),
            (352, 13),
            (1_000_000, 65537),
            (65536, 3),
            (97, 96),
        ] {
            let phi = BigInt::from(phi_n);
            let d = find_private_exponent(&phi, &BigInt::from(e)).unwrap();
            assert!(!d.is_negative() && d < phi);
            assert!(
                (BigInt::from(e) * &d % &phi).is_one(),
                "phi={} e={}",
                phi_n,
                e
            );
        }
    }

    #[test]
    fn test_single_step_chain() {
        // 7 = 2·3 + 1，只有一步
        assert_eq!(d_for(7, 3).unwrap(), BigInt::from(5u32));
    }

    #[test]
    fn test_not_coprime_is_logic_error() {
        let err = d_for(10, 6).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_divisor_gives_no_steps() {
        assert!(matches!(d_for(4, 2), Err(Error::Logic(_))));
    }

    #[test]
    fn test_bad_preconditions() {
        assert!(matches!(d_for(1, 1), Err(Error::InvalidArgument(_))));
        assert!(matches!(d_for(10, 1), Err(Error::InvalidArgument(_))));
        assert!(matches!(d_for(10, 10), Err(Error::InvalidArgument(_))));
        assert!(matches!(d_for(10, 11), Err(Error::InvalidArgument(_))));
    }
}
