//! Order-preserving numeric key normalization.
//!
//! Every numeric field type maps its values and range endpoints into a common
//! ordered `i64` key space. The map for a given field type is monotone and is
//! applied identically to stored endpoints, selection probes, and transient
//! index values, so a value inside a range in the real domain is always inside
//! it in key space too: precision loss can widen a match, never lose one.
//!
//! Floating types use the IEEE-754 sign-flip trick (the classic
//! sortable-bits encoding): positive values keep their bit pattern, negative
//! values flip their magnitude bits, giving a total order under plain `i64`
//! comparison. Half- and single-precision fields round through `f32` first.

use perq_query::Number;

use crate::types::FieldType;

/// Maps an `f64` to an `i64` that sorts in the same order.
pub fn f64_key(value: f64) -> i64 {
    let bits = value.to_bits() as i64;
    bits ^ ((bits >> 63) & 0x7fff_ffff_ffff_ffff)
}

/// Key for a single-precision value: round to `f32`, then encode.
fn f32_key(value: f64) -> i64 {
    f64_key((value as f32) as f64)
}

/// Integer conversion for range endpoints, rounding toward the range interior.
///
/// `[0.5 TO 5.5]` over an integer field means `[1, 5]`: the lower endpoint
/// rounds up, the upper endpoint rounds down. Conversions saturate at the
/// `i64` boundaries.
fn int_endpoint(n: Number, round_up: bool) -> Option<i64> {
    match n {
        Number::Int(v) => Some(v),
        Number::Float(v) if v.is_finite() => {
            let rounded = if round_up { v.ceil() } else { v.floor() };
            Some(rounded as i64)
        }
        Number::Float(_) => None,
    }
}

/// Key for a concrete value of the given field type.
///
/// Returns `None` for non-numeric field types, non-finite floats, and
/// fractional values on integer fields (an integer field can never hold one,
/// so an equality clause on such a value matches nothing).
pub fn value_key(ty: FieldType, n: Number) -> Option<i64> {
    match ty {
        FieldType::Integer | FieldType::Long => match n {
            Number::Int(v) => Some(v),
            Number::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(v as i64),
            Number::Float(_) => None,
        },
        FieldType::HalfFloat | FieldType::Float => {
            let v = n.as_f64();
            v.is_finite().then(|| f32_key(v))
        }
        FieldType::Double => {
            let v = n.as_f64();
            v.is_finite().then(|| f64_key(v))
        }
        _ => None,
    }
}

/// Key for the lower endpoint of an inclusive range over the given field type.
pub fn lower_key(ty: FieldType, n: Number) -> Option<i64> {
    match ty {
        FieldType::Integer | FieldType::Long => int_endpoint(n, true),
        _ => value_key(ty, n),
    }
}

/// Key for the upper endpoint of an inclusive range over the given field type.
pub fn upper_key(ty: FieldType, n: Number) -> Option<i64> {
    match ty {
        FieldType::Integer | FieldType::Long => int_endpoint(n, false),
        _ => value_key(ty, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_key_is_monotone() {
        let samples = [
            f64::NEG_INFINITY,
            -1.0e300,
            -2.5,
            -1.0,
            -f64::MIN_POSITIVE,
            -0.0,
            0.0,
            f64::MIN_POSITIVE,
            0.5,
            1.0,
            2.5,
            1.0e300,
            f64::INFINITY,
        ];
        for pair in samples.windows(2) {
            assert!(
                f64_key(pair[0]) <= f64_key(pair[1]),
                "keys out of order for {} and {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn integer_identity() {
        for v in [i64::MIN, -7, 0, 3, i64::MAX] {
            assert_eq!(value_key(FieldType::Long, Number::Int(v)), Some(v));
            assert_eq!(value_key(FieldType::Integer, Number::Int(v)), Some(v));
        }
    }

    #[test]
    fn fractional_endpoints_round_toward_interior() {
        assert_eq!(
            lower_key(FieldType::Integer, Number::Float(0.5)),
            Some(1) // [0.5 TO ...] cannot contain 0
        );
        assert_eq!(
            upper_key(FieldType::Integer, Number::Float(5.5)),
            Some(5) // [... TO 5.5] cannot contain 6
        );
        assert_eq!(lower_key(FieldType::Integer, Number::Float(-0.5)), Some(0));
        assert_eq!(upper_key(FieldType::Integer, Number::Float(-0.5)), Some(-1));
    }

    #[test]
    fn fractional_value_on_integer_field_has_no_key() {
        assert_eq!(value_key(FieldType::Integer, Number::Float(1.5)), None);
    }

    #[test]
    fn float_containment_survives_encoding() {
        let cases = [(-3.5, -1.0, -2.0), (0.1, 0.3, 0.2), (1.0, 1.0, 1.0)];
        for ty in [FieldType::HalfFloat, FieldType::Float, FieldType::Double] {
            for (lo, hi, v) in cases {
                let lo_key = lower_key(ty, Number::Float(lo)).unwrap();
                let hi_key = upper_key(ty, Number::Float(hi)).unwrap();
                let v_key = value_key(ty, Number::Float(v)).unwrap();
                assert!(lo_key <= v_key && v_key <= hi_key, "{ty:?} [{lo},{hi}] {v}");
            }
        }
    }

    #[test]
    fn non_finite_values_have_no_key() {
        assert_eq!(value_key(FieldType::Double, Number::Float(f64::NAN)), None);
        assert_eq!(
            lower_key(FieldType::Float, Number::Float(f64::INFINITY)),
            None
        );
    }

    #[test]
    fn non_numeric_types_have_no_key() {
        assert_eq!(value_key(FieldType::Text, Number::Int(1)), None);
        assert_eq!(value_key(FieldType::GeoPoint, Number::Int(1)), None);
    }

    #[test]
    fn int_and_float_agree_on_double_fields() {
        assert_eq!(
            value_key(FieldType::Double, Number::Int(5)),
            value_key(FieldType::Double, Number::Float(5.0))
        );
    }
}
