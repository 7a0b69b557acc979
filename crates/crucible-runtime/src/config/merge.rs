//! Deep merge of layered configuration values.
//!
//! The layering contract (lowest to highest precedence): system-wide config
//! file, then the service's own config file. Mappings merge key-by-key
//! recursively; scalars and sequences are replaced wholesale by the higher
//! layer. The merge is right-biased and not commutative.

use serde_json::Value;

/// Merges `overlay` over `base`, producing a new value.
///
/// For every key in `overlay`: when both sides hold a mapping the entries
/// are merged recursively; in every other combination the overlay value
/// replaces the base value entirely — including a mapping replacing a
/// scalar or vice versa. Neither input is mutated, and keys present on only
/// one side are carried through unchanged.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let value = match merged.get(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        (_, replacement) => replacement.clone(),
    }
}

/// Folds an ordered list of layers, later layers winning.
pub fn merge_layers<'a>(layers: impl IntoIterator<Item = &'a Value>) -> Value {
    layers
        .into_iter()
        .fold(Value::Object(serde_json::Map::new()), |merged, layer| {
            deep_merge(&merged, layer)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overlay_leaf_wins_and_base_keys_survive() {
        let base = json!({"a": 1, "b": {"x": 1, "y": 2}, "c": "keep"});
        let overlay = json!({"a": 10, "b": {"y": 20, "z": 30}});

        let merged = deep_merge(&base, &overlay);
        assert_eq!(
            merged,
            json!({"a": 10, "b": {"x": 1, "y": 20, "z": 30}, "c": "keep"})
        );
        // Inputs untouched.
        assert_eq!(base["a"], json!(1));
        assert_eq!(overlay["b"], json!({"y": 20, "z": 30}));
    }

    #[test]
    fn empty_overlay_is_identity() {
        let base = json!({"a": {"deep": [1, 2, 3]}, "b": true});
        assert_eq!(deep_merge(&base, &json!({})), base);
    }

    #[test]
    fn merging_a_mapping_with_itself_is_a_noop() {
        let value = json!({"a": 1, "nested": {"b": [1, 2], "c": null}});
        assert_eq!(deep_merge(&value, &value), value);
    }

    #[test]
    fn sequences_and_scalars_replace_wholesale() {
        let base = json!({"list": [1, 2, 3], "n": 1});
        let overlay = json!({"list": [9], "n": {"now": "a map"}});
        assert_eq!(
            deep_merge(&base, &overlay),
            json!({"list": [9], "n": {"now": "a map"}})
        );
    }

    #[test]
    fn mapping_replaced_by_scalar_and_back() {
        let base = json!({"k": {"a": 1}});
        assert_eq!(deep_merge(&base, &json!({"k": 7})), json!({"k": 7}));

        let base = json!({"k": 7});
        assert_eq!(
            deep_merge(&base, &json!({"k": {"a": 1}})),
            json!({"k": {"a": 1}})
        );
    }

    #[test]
    fn merge_is_not_commutative() {
        let a = json!({"k": 1});
        let b = json!({"k": 2});
        assert_ne!(deep_merge(&a, &b), deep_merge(&b, &a));
    }

    #[test]
    fn layers_fold_in_precedence_order() {
        let system = json!({"timeout": 30, "logging": {"level": "info"}});
        let service = json!({"timeout": 5, "logging": {"format": "full"}});
        let merged = merge_layers([&system, &service]);
        assert_eq!(
            merged,
            json!({"timeout": 5, "logging": {"level": "info", "format": "full"}})
        );
    }
}
