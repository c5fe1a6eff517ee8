/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

pub mod combine;
pub mod selftest;
pub mod total;

use monoid_registry::Value;

/// Parse a JSON document into a [`Value`]. At most `limit` characters
/// of the input are echoed back in errors.
pub fn parse_value(json: &str, limit: usize) -> anyhow::Result<Value> {
    let parsed: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        let echoed: String = json.chars().take(limit).collect();
        anyhow::anyhow!("could not parse '{}' as JSON: {}", echoed, e)
    })?;
    Ok(Value::try_from(parsed)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_documents() {
        assert_eq!(
            parse_value(r#"{"a": [1, 2], "b": 1}"#, 80).unwrap(),
            Value::map([("a", Value::seq([1, 2])), ("b", Value::from(1))])
        );
    }

    #[test]
    fn rejects_null_and_garbage() {
        assert!(parse_value("null", 80).is_err());
        assert!(parse_value("{", 80).is_err());
        assert!(parse_value("18446744073709551615", 80).is_err());
    }

    #[test]
    fn parse_errors_echo_a_bounded_prefix() {
        let json = format!("[{}", "1, ".repeat(10_000));
        let message = parse_value(&json, 8).unwrap_err().to_string();
        assert!(message.starts_with("could not parse '[1, 1, 1' as JSON"));
        assert!(message.len() < 200);
    }
}
