//! Literal token scanner and recursive-descent parser for the
//! restricted object-literal grammar found in hydration payloads.
//!
//! The grammar covers object/array literals, single- and double-quoted
//! strings with backslash escapes (including `\uXXXX`), signed
//! integer/decimal/exponent numbers, `true`/`false`/`null`,
//! `undefined`/`void 0`, and bare identifiers. Identifiers resolve
//! through a caller-supplied binding map (the IIFE's parameter →
//! argument substitution); unknown identifiers normalize to `Null`.
//! Nothing here executes: the input is treated purely as data.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::value::Value;

pub(crate) struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    pub(crate) fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.bump();
        }
    }

    pub(crate) fn at_end(&mut self) -> bool {
        self.skip_ws();
        self.pos >= self.src.len()
    }

    /// Parse a quoted string starting at the opening quote.
    ///
    /// Copies unescaped runs wholesale; escape handling covers the
    /// JSON set plus single-quote and `\0`. Unpaired surrogates decode
    /// to U+FFFD rather than failing the whole extraction.
    fn parse_string(&mut self) -> Option<String> {
        let quote = self.peek()?;
        self.bump();

        let bytes = self.src.as_bytes();
        let mut out = String::new();
        let mut run_start = self.pos;

        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if b == quote {
                out.push_str(&self.src[run_start..self.pos]);
                self.bump();
                return Some(out);
            }
            if b == b'\\' {
                out.push_str(&self.src[run_start..self.pos]);
                self.bump();
                let esc = self.peek()?;
                match esc {
                    b'n' => {
                        out.push('\n');
                        self.bump();
                    }
                    b't' => {
                        out.push('\t');
                        self.bump();
                    }
                    b'r' => {
                        out.push('\r');
                        self.bump();
                    }
                    b'b' => {
                        out.push('\u{0008}');
                        self.bump();
                    }
                    b'f' => {
                        out.push('\u{000C}');
                        self.bump();
                    }
                    b'0' => {
                        out.push('\0');
                        self.bump();
                    }
                    b'u' => {
                        self.bump();
                        out.push(self.parse_unicode_escape()?);
                    }
                    _ => {
                        // \" \' \\ \/ and any other escaped char: keep it
                        let ch = self.src[self.pos..].chars().next()?;
                        out.push(ch);
                        self.pos += ch.len_utf8();
                    }
                }
                run_start = self.pos;
            } else {
                self.bump();
            }
        }
        None // unterminated
    }

    /// Parse the four hex digits after `\u`, combining surrogate pairs.
    fn parse_unicode_escape(&mut self) -> Option<char> {
        let hex = self.src.get(self.pos..self.pos + 4)?;
        let high = u32::from_str_radix(hex, 16).ok()?;
        self.pos += 4;

        if (0xD800..0xDC00).contains(&high) {
            if self.src[self.pos..].starts_with("\\u") {
                if let Some(low_hex) = self.src.get(self.pos + 2..self.pos + 6) {
                    if let Ok(low) = u32::from_str_radix(low_hex, 16) {
                        if (0xDC00..0xE000).contains(&low) {
                            self.pos += 6;
                            let cp = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                            return char::from_u32(cp);
                        }
                    }
                }
            }
            return Some('\u{FFFD}');
        }
        if (0xDC00..0xE000).contains(&high) {
            return Some('\u{FFFD}');
        }
        char::from_u32(high)
    }

    fn parse_number(&mut self) -> Option<f64> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.bump();
        }
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.bump();
        }
        if self.peek() == Some(b'.') {
            self.bump();
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.bump();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.bump();
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }
        self.src[start..self.pos].parse::<f64>().ok()
    }

    fn parse_ident(&mut self) -> Option<&'a str> {
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => {}
            _ => return None,
        }
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' {
                self.bump();
            } else {
                break;
            }
        }
        Some(&self.src[start..self.pos])
    }

    /// Recursive-descent entry point for the templated body.
    pub(crate) fn parse_value(&mut self, bindings: &HashMap<&str, Value>) -> Option<Value> {
        self.skip_ws();
        match self.peek()? {
            b'{' => self.parse_object(bindings),
            b'[' => self.parse_array(bindings),
            b'"' | b'\'' => self.parse_string().map(Value::String),
            b'+' | b'-' | b'.' | b'0'..=b'9' => self.parse_number().map(Value::Number),
            _ => {
                let ident = self.parse_ident()?;
                match ident {
                    "true" => Some(Value::Bool(true)),
                    "false" => Some(Value::Bool(false)),
                    "null" | "undefined" => Some(Value::Null),
                    "void" => {
                        // `void <operand>` always evaluates to undefined
                        self.skip_ws();
                        match self.peek() {
                            Some(b'+' | b'-' | b'.' | b'0'..=b'9') => {
                                self.parse_number()?;
                            }
                            _ => {
                                self.parse_ident()?;
                            }
                        }
                        Some(Value::Null)
                    }
                    name => Some(bindings.get(name).cloned().unwrap_or(Value::Null)),
                }
            }
        }
    }

    fn parse_object(&mut self, bindings: &HashMap<&str, Value>) -> Option<Value> {
        self.bump(); // {
        let mut map = IndexMap::new();
        loop {
            self.skip_ws();
            let key = match self.peek()? {
                b'}' => {
                    self.bump();
                    return Some(Value::Object(map));
                }
                b'"' | b'\'' => self.parse_string()?,
                b'-' | b'.' | b'0'..=b'9' => {
                    let n = self.parse_number()?;
                    if n.fract() == 0.0 {
                        format!("{}", n as i64)
                    } else {
                        n.to_string()
                    }
                }
                _ => self.parse_ident()?.to_string(),
            };

            self.skip_ws();
            if self.peek()? != b':' {
                return None;
            }
            self.bump();

            let value = self.parse_value(bindings)?;
            map.insert(key, value);

            self.skip_ws();
            match self.peek()? {
                b',' => self.bump(),
                b'}' => {}
                _ => return None,
            }
        }
    }

    fn parse_array(&mut self, bindings: &HashMap<&str, Value>) -> Option<Value> {
        self.bump(); // [
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek()? == b']' {
                self.bump();
                return Some(Value::Array(items));
            }
            items.push(self.parse_value(bindings)?);
            self.skip_ws();
            match self.peek()? {
                b',' => self.bump(),
                b']' => {}
                _ => return None,
            }
        }
    }

    /// Consume input until the next top-level comma, skipping quoted
    /// strings wholesale so commas inside them do not terminate.
    fn skip_to_comma(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b',' => break,
                b'"' | b'\'' => {
                    let _ = self.parse_string();
                }
                _ => self.bump(),
            }
        }
    }
}

/// Scan an invocation's argument text into an ordered list of
/// primitive values.
///
/// Recognized tokens: quoted strings, `null`, `true`, `false`, and
/// numbers. Anything else (including `void 0` and stray expressions)
/// counts as `undefined`: the scanner records `Null` and skips to the
/// next comma.
pub(crate) fn parse_arguments(src: &str) -> Vec<Value> {
    if src.trim().is_empty() {
        return Vec::new();
    }

    let mut scanner = Scanner::new(src);
    let mut args = Vec::new();
    loop {
        scanner.skip_ws();
        let token = match scanner.peek() {
            Some(b'"' | b'\'') => scanner.parse_string().map(Value::String),
            Some(b'+' | b'-' | b'.' | b'0'..=b'9') => scanner.parse_number().map(Value::Number),
            _ => scanner.parse_ident().and_then(|ident| match ident {
                "null" | "undefined" => Some(Value::Null),
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            }),
        };

        let value = match token {
            Some(v) => {
                scanner.skip_ws();
                match scanner.peek() {
                    None | Some(b',') => v,
                    // Recognized prefix but trailing junk: whole slot is undefined
                    Some(_) => {
                        scanner.skip_to_comma();
                        Value::Null
                    }
                }
            }
            None => {
                scanner.skip_to_comma();
                Value::Null
            }
        };
        args.push(value);

        match scanner.peek() {
            Some(b',') => {
                scanner.bump();
                if scanner.at_end() {
                    break; // trailing comma
                }
            }
            _ => break,
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_bindings() -> HashMap<&'static str, Value> {
        HashMap::new()
    }

    #[test]
    fn test_parses_primitive_arguments() {
        let args = parse_arguments(r#"1,"Foo",null,true,false,-2.5,1e3"#);
        assert_eq!(
            args,
            vec![
                Value::Number(1.0),
                Value::String("Foo".into()),
                Value::Null,
                Value::Bool(true),
                Value::Bool(false),
                Value::Number(-2.5),
                Value::Number(1000.0),
            ]
        );
    }

    #[test]
    fn test_unknown_argument_tokens_become_undefined() {
        let args = parse_arguments(r#"void 0,{a:1},"kept""#);
        assert_eq!(
            args,
            vec![Value::Null, Value::Null, Value::String("kept".into())]
        );
    }

    #[test]
    fn test_string_arguments_may_contain_commas_and_quotes() {
        let args = parse_arguments(r#""a,b",'it\'s',"q\"q""#);
        assert_eq!(
            args,
            vec![
                Value::String("a,b".into()),
                Value::String("it's".into()),
                Value::String("q\"q".into()),
            ]
        );
    }

    #[test]
    fn test_unicode_escapes() {
        let args = parse_arguments(r#""é😀""#);
        assert_eq!(args, vec![Value::String("é😀".into())]);
    }

    #[test]
    fn test_object_body_with_bindings() {
        let mut bindings = HashMap::new();
        bindings.insert("a", Value::Number(7.0));
        bindings.insert("b", Value::String("x".into()));

        let mut scanner = Scanner::new(r#"{id:a,label:b,flag:true,none:undefined,list:[a,2]}"#);
        let value = scanner.parse_value(&bindings).unwrap();

        assert_eq!(value.get("id").and_then(Value::as_u64), Some(7));
        assert_eq!(value.get("label").and_then(Value::as_str), Some("x"));
        assert_eq!(value.get("flag").and_then(Value::as_bool), Some(true));
        assert!(value.get("none").unwrap().is_null());
        assert_eq!(
            value.get("list").and_then(Value::as_array).map(|a| a.len()),
            Some(2)
        );
    }

    #[test]
    fn test_keys_are_never_substituted() {
        // A key that collides with a parameter name must stay a key
        let mut bindings = HashMap::new();
        bindings.insert("a", Value::Number(1.0));

        let mut scanner = Scanner::new("{a:a}");
        let value = scanner.parse_value(&bindings).unwrap();
        assert_eq!(value.get("a").and_then(Value::as_u64), Some(1));
    }

    #[test]
    fn test_quoted_and_numeric_keys() {
        let mut scanner = Scanner::new(r#"{"k v":1,'s':2,0:3}"#);
        let value = scanner.parse_value(&no_bindings()).unwrap();
        assert_eq!(value.get("k v").and_then(Value::as_u64), Some(1));
        assert_eq!(value.get("s").and_then(Value::as_u64), Some(2));
        assert_eq!(value.get("0").and_then(Value::as_u64), Some(3));
    }

    #[test]
    fn test_trailing_commas_tolerated() {
        let mut scanner = Scanner::new("{a:1,b:[1,2,],}");
        let value = scanner.parse_value(&no_bindings()).unwrap();
        assert_eq!(value.get("a").and_then(Value::as_u64), Some(1));
        assert_eq!(
            value.get("b").and_then(Value::as_array).map(|a| a.len()),
            Some(2)
        );
    }

    #[test]
    fn test_unknown_identifier_value_is_null() {
        let mut scanner = Scanner::new("{a:mystery}");
        let value = scanner.parse_value(&no_bindings()).unwrap();
        assert!(value.get("a").unwrap().is_null());
    }

    #[test]
    fn test_malformed_body_is_none_not_panic() {
        for src in ["{a:}", "{a 1}", "{", "[1,", "{a:1"] {
            let mut scanner = Scanner::new(src);
            assert!(scanner.parse_value(&no_bindings()).is_none(), "src = {src}");
        }
    }
}
