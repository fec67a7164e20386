//! Prime detection over the numeric partition

use serde_json::Value;

use super::coerce;

/// Smallest magnitude at which every `f64` is an even integer
const TWO_POW_53: f64 = 9_007_199_254_740_992.0;

/// Trial division up to `floor(sqrt(n))`
pub const fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    let mut i = 2;
    while i <= n / i {
        if n.is_multiple_of(i) {
            return false;
        }
        i += 1;
    }
    true
}

/// Primality of a lenient integer parse of `value`
///
/// Unparseable values and values at or above 2^53 are not prime; at that
/// magnitude the parsed float is always even.
pub fn is_prime_value(value: &Value) -> bool {
    let Some(parsed) = coerce::parse_int(value) else {
        return false;
    };
    if parsed <= 1.0 || parsed >= TWO_POW_53 {
        return false;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = parsed as u64;
    is_prime(n)
}

/// True as soon as one element is prime
pub fn any_prime(numbers: &[Value]) -> bool {
    numbers.iter().any(is_prime_value)
}
