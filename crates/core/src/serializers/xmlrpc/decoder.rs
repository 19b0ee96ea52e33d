//! XML-RPC `<params>` decoder.
//!
//! Covers the element subset produced by XML-RPC marshallers: no attributes,
//! no namespaces, whitespace between elements is insignificant.

use serde_json::{Map, Number, Value};

use super::error::DecodeError;

/// Deepest `<value>` nesting accepted before decoding gives up.
pub const MAX_DEPTH: usize = 128;

/// Decode a `<params>` envelope into its parameter values.
pub fn decode_params(input: &str) -> Result<Vec<Value>, DecodeError> {
    let mut decoder = Decoder {
        src: input,
        x: 0,
        depth: 0,
    };
    decoder.skip_prolog()?;
    let params = decoder.read_params()?;
    decoder.skip_misc()?;
    if decoder.x < decoder.src.len() {
        return Err(DecodeError::TrailingContent(decoder.x));
    }
    Ok(params)
}

struct Tag<'a> {
    name: &'a str,
    closing: bool,
    self_closing: bool,
}

struct Decoder<'a> {
    src: &'a str,
    x: usize,
    /// Number of `<value>` elements currently open.
    depth: usize,
}

impl<'a> Decoder<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.x..]
    }

    fn expected(&self, what: impl Into<String>) -> DecodeError {
        if self.x >= self.src.len() {
            DecodeError::UnexpectedEof
        } else {
            DecodeError::Expected {
                expected: what.into(),
                position: self.x,
            }
        }
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.x += rest.len() - rest.trim_start().len();
    }

    /// Skip whitespace and comments.
    fn skip_misc(&mut self) -> Result<(), DecodeError> {
        loop {
            self.skip_ws();
            if self.rest().starts_with("<!--") {
                let end = self.rest().find("-->").ok_or(DecodeError::UnexpectedEof)?;
                self.x += end + 3;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_prolog(&mut self) -> Result<(), DecodeError> {
        self.skip_misc()?;
        if self.rest().starts_with("<?xml") {
            let end = self.rest().find("?>").ok_or(DecodeError::UnexpectedEof)?;
            self.x += end + 2;
        }
        self.skip_misc()
    }

    /// Read the tag at the cursor without consuming it.
    fn peek_tag(&self) -> Result<(Tag<'a>, usize), DecodeError> {
        let rest = self.rest();
        if !rest.starts_with('<') {
            return Err(self.expected("a tag"));
        }
        let end = rest.find('>').ok_or(DecodeError::UnexpectedEof)?;
        let inner = &rest[1..end];
        let (closing, inner) = match inner.strip_prefix('/') {
            Some(i) => (true, i),
            None => (false, inner),
        };
        let (self_closing, inner) = match inner.strip_suffix('/') {
            Some(i) => (true, i),
            None => (false, inner),
        };
        let name = inner.trim_end();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(self.expected("a tag without attributes"));
        }
        Ok((
            Tag {
                name,
                closing,
                self_closing,
            },
            end + 1,
        ))
    }

    /// Consume `<name>` or `<name/>`; returns true for the self-closing form.
    fn open(&mut self, name: &str) -> Result<bool, DecodeError> {
        self.skip_misc()?;
        let (tag, len) = self.peek_tag()?;
        if tag.closing || tag.name != name {
            return Err(self.expected(format!("<{name}>")));
        }
        self.x += len;
        Ok(tag.self_closing)
    }

    fn close(&mut self, name: &str) -> Result<(), DecodeError> {
        self.skip_misc()?;
        let (tag, len) = self.peek_tag()?;
        if !tag.closing || tag.self_closing || tag.name != name {
            return Err(self.expected(format!("</{name}>")));
        }
        self.x += len;
        Ok(())
    }

    /// True when the next tag closes `name`.
    fn at_close(&mut self, name: &str) -> Result<bool, DecodeError> {
        self.skip_misc()?;
        let (tag, _) = self.peek_tag()?;
        Ok(tag.closing && tag.name == name)
    }

    /// Raw character data up to the next `<`, entities resolved.
    fn text(&mut self) -> Result<String, DecodeError> {
        let rest = self.rest();
        let end = rest.find('<').ok_or(DecodeError::UnexpectedEof)?;
        self.x += end;
        unescape(&rest[..end])
    }

    /// `<name>text</name>` or `<name/>`.
    fn text_element(&mut self, name: &str) -> Result<String, DecodeError> {
        if self.open(name)? {
            return Ok(String::new());
        }
        let text = self.text()?;
        self.close(name)?;
        Ok(text)
    }

    fn read_params(&mut self) -> Result<Vec<Value>, DecodeError> {
        let mut params = Vec::new();
        if self.open("params")? {
            return Ok(params);
        }
        while !self.at_close("params")? {
            self.open("param")?;
            params.push(self.read_value()?);
            self.close("param")?;
        }
        self.close("params")?;
        Ok(params)
    }

    fn read_value(&mut self) -> Result<Value, DecodeError> {
        if self.depth == MAX_DEPTH {
            return Err(DecodeError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let value = self.read_value_body();
        self.depth -= 1;
        value
    }

    fn read_value_body(&mut self) -> Result<Value, DecodeError> {
        if self.open("value")? {
            return Ok(Value::String(String::new()));
        }

        // Untyped content is a string, and its whitespace is significant.
        let start = self.x;
        let text = self.text()?;
        let (tag, _) = self.peek_tag()?;
        if tag.closing {
            self.close("value")?;
            return Ok(Value::String(text));
        }
        if !text.trim().is_empty() {
            return Err(DecodeError::Expected {
                expected: "a typed value".to_string(),
                position: start,
            });
        }

        let value = match tag.name {
            "string" | "dateTime.iso8601" => Value::String(self.text_element(tag.name)?),
            "int" | "i4" | "i8" => {
                let raw = self.text_element(tag.name)?;
                let n: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| DecodeError::InvalidNumber(raw.clone()))?;
                Value::from(n)
            }
            "double" => {
                let raw = self.text_element("double")?;
                raw.trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or(DecodeError::InvalidNumber(raw))?
            }
            "boolean" => {
                let raw = self.text_element("boolean")?;
                let flag = match raw.trim() {
                    "1" => Some(true),
                    "0" => Some(false),
                    _ => None,
                };
                Value::Bool(flag.ok_or(DecodeError::InvalidBoolean(raw))?)
            }
            "nil" => {
                if !self.open("nil")? {
                    self.close("nil")?;
                }
                Value::Null
            }
            "array" => self.read_array()?,
            "struct" => self.read_struct()?,
            other => return Err(DecodeError::UnknownType(other.to_string())),
        };

        self.close("value")?;
        Ok(value)
    }

    fn read_array(&mut self) -> Result<Value, DecodeError> {
        let mut items = Vec::new();
        if self.open("array")? {
            return Ok(Value::Array(items));
        }
        if !self.open("data")? {
            while !self.at_close("data")? {
                items.push(self.read_value()?);
            }
            self.close("data")?;
        }
        self.close("array")?;
        Ok(Value::Array(items))
    }

    fn read_struct(&mut self) -> Result<Value, DecodeError> {
        let mut map = Map::new();
        if self.open("struct")? {
            return Ok(Value::Object(map));
        }
        while !self.at_close("struct")? {
            self.open("member")?;
            let name = self.text_element("name")?;
            let value = self.read_value()?;
            self.close("member")?;
            map.insert(name, value);
        }
        self.close("struct")?;
        Ok(Value::Object(map))
    }
}

fn unescape(raw: &str) -> Result<String, DecodeError> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| DecodeError::InvalidEntity(after.to_string()))?;
        let entity = &after[..semi];
        let c = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| DecodeError::InvalidEntity(entity.to_string()))?
            }
        };
        out.push(c);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
