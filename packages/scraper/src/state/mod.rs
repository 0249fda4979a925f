//! Hydration-state extraction.
//!
//! Server-rendered pages embed their client state as an
//! immediately-invoked function expression assigned to a well-known
//! global:
//!
//! ```text
//! window.__NUXT__=(function(a,b){return {id:a,title:b}}(1,"Foo"));
//! ```
//!
//! The parameter list is a template over the returned object body and
//! the call-site arguments carry the literal values. This module
//! reconstructs the state as a [`Value`] tree by parsing that shape —
//! it never evaluates the embedded script, which is untrusted page
//! content. Every malformed input is a recoverable "no state" result,
//! not a fault.

mod literal;
mod value;

pub use value::Value;

use std::collections::HashMap;

use tracing::debug;

/// Global the hydration expression is assigned to.
const STATE_MARKER: &str = "window.__NUXT__";

/// Extract the embedded hydration state from raw page text.
///
/// Returns `None` when the marker is missing or any part of the
/// payload fails to parse.
pub fn extract_state(html: &str) -> Option<Value> {
    let start = html.find(STATE_MARKER)?;
    let rest = html[start + STATE_MARKER.len()..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let rest = rest.strip_prefix('(')?.trim_start();
    let rest = rest.strip_prefix("function")?.trim_start();

    // Formal parameter list: flat, never itself parenthesized
    let rest = rest.strip_prefix('(')?;
    let params_end = rest.find(')')?;
    let params: Vec<&str> = rest[..params_end]
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    let rest = &rest[params_end + 1..];

    // Templated object body: first `{` after the return keyword,
    // closed by string-aware brace balancing
    let return_at = rest.find("return")?;
    let after_return = &rest[return_at + "return".len()..];
    let body_open = after_return.find('{')?;
    let body = balanced_slice(&after_return[body_open..], b'{', b'}')?;
    let after_body = &after_return[body_open + body.len()..];

    // Invocation argument list: next `(`, closed by paren balancing
    let args_open = after_body.find('(')?;
    let args_slice = balanced_slice(&after_body[args_open..], b'(', b')')?;
    let args = literal::parse_arguments(&args_slice[1..args_slice.len() - 1]);

    if params.len() != args.len() {
        debug!(
            params = params.len(),
            args = args.len(),
            "hydration parameter/argument arity mismatch"
        );
        return None;
    }

    let bindings: HashMap<&str, Value> = params.into_iter().zip(args).collect();

    let mut scanner = literal::Scanner::new(body);
    let state = scanner.parse_value(&bindings)?;
    if !scanner.at_end() {
        debug!("trailing content inside hydration object body");
        return None;
    }
    Some(state)
}

/// Slice from an opening delimiter to its balanced closing partner,
/// inclusive. Quoted strings (single or double, with backslash
/// escapes) do not affect depth.
fn balanced_slice(src: &str, open: u8, close: u8) -> Option<&str> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut in_string: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == quote {
                in_string = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' => in_string = Some(b),
            _ if b == open => depth += 1,
            _ if b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&src[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_simple_payload() {
        let html = r#"<html><script>
            window.__NUXT__=(function(a,b){return {id:a,title:b}}(1,"Foo"));
        </script></html>"#;

        let state = extract_state(html).unwrap();
        assert_eq!(state.get("id").and_then(Value::as_u64), Some(1));
        assert_eq!(state.get("title").and_then(Value::as_str), Some("Foo"));
    }

    #[test]
    fn test_no_marker_is_no_state() {
        assert!(extract_state("<html><body>static page</body></html>").is_none());
    }

    #[test]
    fn test_arity_mismatch_is_no_state() {
        let html = r#"window.__NUXT__=(function(a,b){return {id:a}}(1));"#;
        assert!(extract_state(html).is_none());
    }

    #[test]
    fn test_string_argument_matching_parameter_name_survives() {
        // The literal "b" must not be confused with parameter b
        let html = r#"window.__NUXT__=(function(a,b){return {x:a,y:b}}("b","a, b: 1"));"#;
        let state = extract_state(html).unwrap();
        assert_eq!(state.get("x").and_then(Value::as_str), Some("b"));
        assert_eq!(state.get("y").and_then(Value::as_str), Some("a, b: 1"));
    }

    #[test]
    fn test_key_colliding_with_parameter_stays_a_key() {
        let html = r#"window.__NUXT__=(function(a){return {a:a,aa:2}}(9));"#;
        let state = extract_state(html).unwrap();
        assert_eq!(state.get("a").and_then(Value::as_u64), Some(9));
        assert_eq!(state.get("aa").and_then(Value::as_u64), Some(2));
    }

    #[test]
    fn test_nested_braces_and_strings_in_body() {
        let html = r#"window.__NUXT__=(function(a){return {s:"}{",deep:{list:[{v:a}]}}}(5));"#;
        let state = extract_state(html).unwrap();
        assert_eq!(state.get("s").and_then(Value::as_str), Some("}{"));
        let v = state.path(&["deep", "list"]).and_then(Value::as_array).unwrap()[0]
            .get("v")
            .and_then(Value::as_u64);
        assert_eq!(v, Some(5));
    }

    #[test]
    fn test_alternate_invocation_form() {
        // `(function(){...})(args)` instead of `(function(){...}(args))`
        let html = r#"window.__NUXT__=(function(n){return {n:n}})(3);"#;
        let state = extract_state(html).unwrap();
        assert_eq!(state.get("n").and_then(Value::as_u64), Some(3));
    }

    #[test]
    fn test_zero_parameters() {
        let html = r#"window.__NUXT__=(function(){return {ok:true}}());"#;
        let state = extract_state(html).unwrap();
        assert_eq!(state.get("ok").and_then(Value::as_bool), Some(true));
    }

    #[test]
    fn test_undefined_arguments_bind_as_null() {
        let html = r#"window.__NUXT__=(function(a,b){return {a:a,b:b}}(void 0,2));"#;
        let state = extract_state(html).unwrap();
        assert!(state.get("a").unwrap().is_null());
        assert_eq!(state.get("b").and_then(Value::as_u64), Some(2));
    }

    #[test]
    fn test_malformed_body_is_no_state() {
        let html = r#"window.__NUXT__=(function(a){return {a:a+1}}(1));"#;
        assert!(extract_state(html).is_none());
    }
}
