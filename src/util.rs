//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic). Literal braces
/// that do not match a provided key pass through untouched, which lets prompt
/// templates embed example JSON objects.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_all_keys() {
    let out = fill_template("Company: {company}, Role: {role}", &[("company", "Acme"), ("role", "SDE")]);
    assert_eq!(out, "Company: Acme, Role: SDE");
  }

  #[test]
  fn fill_template_keeps_literal_braces() {
    let out = fill_template("{\"score\": 8, \"q\": \"{question}\"}", &[("question", "Why Rust?")]);
    assert_eq!(out, "{\"score\": 8, \"q\": \"Why Rust?\"}");
  }

  #[test]
  fn trunc_for_log_short_passthrough() {
    assert_eq!(trunc_for_log("short", 10), "short");
  }
}
