//! Change detection between the stored payload and a freshly fetched one.
//!
//! # Design
//! - Presence is checked before any structural work: `None` only equals `None`.
//! - Structural comparison is the default; serialised comparison is kept for
//!   scalar payloads where it is cheap and exact.
//! - Detectors are stateless so one instance can be shared across resources.

use serde::Serialize;
use serde_json::Value;

/// Decides whether a new payload differs from the stored one.
pub trait ChangeDetector<T: ?Sized> {
    /// Equality of two present payloads under this strategy.
    fn same(&self, old: &T, new: &T) -> bool;

    /// Whether replacing `old` with `new` is a real change.
    fn has_changed(&self, old: Option<&T>, new: Option<&T>) -> bool {
        match (old, new) {
            (None, None) => false,
            (Some(_), None) | (None, Some(_)) => true,
            (Some(old), Some(new)) => !self.same(old, new),
        }
    }
}

/// Recursive structural equality through `PartialEq`.
///
/// Derived `PartialEq` on the payload DTOs compares field by field, and
/// sequences compare lengths before elements, so this short-circuits on the
/// first mismatch without allocating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StructuralEq;

impl<T: PartialEq + ?Sized> ChangeDetector<T> for StructuralEq {
    fn same(&self, old: &T, new: &T) -> bool {
        old == new
    }
}

/// Deep comparison of untyped JSON trees.
///
/// Numbers compare by numeric value, so `1` and `1.0` are equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonDeepEq;

impl ChangeDetector<Value> for JsonDeepEq {
    fn same(&self, old: &Value, new: &Value) -> bool {
        deep_equal(old, new)
    }
}

/// Compare canonical `serde_json` encodings.
///
/// Allocates both encodings on every call; prefer [`StructuralEq`] for
/// composite payloads. A payload that fails to serialise counts as changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SerializedEq;

impl<T: Serialize + ?Sized> ChangeDetector<T> for SerializedEq {
    fn same(&self, old: &T, new: &T) -> bool {
        match (serde_json::to_string(old), serde_json::to_string(new)) {
            (Ok(old), Ok(new)) => old == new,
            _ => false,
        }
    }
}

/// Treat every fetch as a change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overwrite;

impl<T: ?Sized> ChangeDetector<T> for Overwrite {
    fn same(&self, _old: &T, _new: &T) -> bool {
        false
    }
}

/// Recursive equality over JSON values.
///
/// Arrays compare length first and then element-wise; objects compare key
/// counts first and then each key. Both stop at the first difference.
#[must_use]
pub fn deep_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| deep_equal(x, y)))
        }
        _ => false,
    }
}

#[allow(clippy::float_cmp)]
fn numbers_equal(a: &serde_json::Number, b: &serde_json::Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Cpu {
        total_usage: f64,
        cores: Vec<f64>,
    }

    #[test]
    fn absence_is_a_first_class_discriminator() {
        let detector = StructuralEq;
        assert!(!ChangeDetector::<u32>::has_changed(&detector, None, None));
        assert!(detector.has_changed(None, Some(&1_u32)));
        assert!(detector.has_changed(Some(&1_u32), None));
    }

    #[test]
    fn json_null_never_equals_empty_composites() {
        let detector = JsonDeepEq;
        assert!(detector.has_changed(Some(&Value::Null), Some(&json!({}))));
        assert!(detector.has_changed(Some(&json!([])), Some(&Value::Null)));
        assert!(detector.has_changed(Some(&json!({})), Some(&json!([]))));
        assert!(!detector.has_changed(Some(&Value::Null), Some(&Value::Null)));
    }

    #[test]
    fn structural_eq_sees_identical_instances_as_unchanged() {
        let old = Cpu {
            total_usage: 42.0,
            cores: vec![40.0, 44.0],
        };
        let new = old.clone();
        assert!(!StructuralEq.has_changed(Some(&old), Some(&new)));
    }

    #[test]
    fn structural_eq_detects_leaf_change() {
        let old = Cpu {
            total_usage: 42.0,
            cores: vec![40.0, 44.0],
        };
        let mut new = old.clone();
        new.cores[1] = 45.0;
        assert!(StructuralEq.has_changed(Some(&old), Some(&new)));
    }

    #[test]
    fn deep_equal_walks_nested_values() {
        let old = json!({"total_usage": 42, "cpu_count": {"physical": 4, "logical": 8}});
        let same = json!({"cpu_count": {"logical": 8, "physical": 4}, "total_usage": 42});
        let changed = json!({"total_usage": 42, "cpu_count": {"physical": 4, "logical": 16}});
        assert!(deep_equal(&old, &same));
        assert!(!deep_equal(&old, &changed));
    }

    #[test]
    fn deep_equal_checks_sizes_before_elements() {
        assert!(!deep_equal(&json!([1, 2]), &json!([1, 2, 3])));
        assert!(!deep_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!deep_equal(&json!({"a": 1}), &json!({"b": 1})));
    }

    #[test]
    fn deep_equal_compares_numbers_by_value() {
        assert!(deep_equal(&json!(1), &json!(1.0)));
        assert!(deep_equal(&json!(-3), &json!(-3)));
        assert!(!deep_equal(&json!(55), &json!(56)));
        assert!(!deep_equal(&json!(1), &json!("1")));
    }

    #[test]
    fn serialized_eq_matches_encoded_form() {
        let detector = SerializedEq;
        assert!(!detector.has_changed(Some(&json!({"percent": 55})), Some(&json!({"percent": 55}))));
        assert!(detector.has_changed(Some(&json!({"percent": 55})), Some(&json!({"percent": 56}))));
        assert!(!detector.has_changed(Some(&"eth0"), Some(&"eth0")));
    }

    #[test]
    fn overwrite_always_reports_change() {
        assert!(Overwrite.has_changed(Some(&1_u8), Some(&1_u8)));
        assert!(!ChangeDetector::<u8>::has_changed(&Overwrite, None, None));
    }
}
