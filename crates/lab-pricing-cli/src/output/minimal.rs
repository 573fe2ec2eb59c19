use serde_json::Value;

use super::flatten;

/// Headline figures in priority order, matched on the last path segment.
const PRIORITY_KEYS: [&str; 4] = ["total_price", "panel_price", "count", "id"];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields at any depth, then falls back to the
/// first field in the result.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let mut pairs = Vec::new();
    flatten("", result_obj, &mut pairs);

    match pick(&pairs) {
        Some(v) => println!("{}", v),
        None => match pairs.first() {
            Some((key, val)) if !key.is_empty() => println!("{}: {}", key, val),
            Some((_, val)) => println!("{}", val),
            None => println!(),
        },
    }
}

fn pick(pairs: &[(String, String)]) -> Option<&str> {
    PRIORITY_KEYS.iter().find_map(|key| {
        pairs
            .iter()
            .find(|(path, val)| {
                !val.is_empty() && path.rsplit('.').next() == Some(*key)
            })
            .map(|(_, val)| val.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pick_finds_nested_total() {
        let value = json!({
            "pricing": {"subtotal": "124.4", "total_price": "129.4"},
            "analytics": {"panel_price": "129.4"},
        });
        let mut pairs = Vec::new();
        flatten("", &value, &mut pairs);
        assert_eq!(pick(&pairs), Some("129.4"));
    }

    #[test]
    fn test_pick_none_without_known_keys() {
        let pairs = vec![("subtotal".to_string(), "1".to_string())];
        assert_eq!(pick(&pairs), None);
    }
}
