use serde_json::Value;

/// Headline fields, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "best_scenario",
    "emi",
    "total_interest",
    "payoff_date",
    "total_payment",
    "residual_balance",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match headline(result_obj) {
        Some((key, val)) => println!("{}: {}", key, format_minimal(val)),
        None => println!("{}", format_minimal(result_obj)),
    }
}

/// Search priority keys at the top level, then one level down (e.g. the
/// `analysis` block of a scenario report).
fn headline(value: &Value) -> Option<(&str, &Value)> {
    let map = value.as_object()?;
    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return Some((key, val));
        }
    }
    map.values().find_map(|v| match v {
        Value::Object(_) => headline(v),
        _ => None,
    })
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
