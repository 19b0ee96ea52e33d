//! XML-RPC encoder.

use serde_json::{Map, Number, Value};

use crate::error::SerializeError;

/// Writes XML-RPC markup into an in-memory buffer.
pub struct XmlRpcEncoder {
    out: String,
}

impl Default for XmlRpcEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlRpcEncoder {
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(256),
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    pub fn begin_params(&mut self) {
        self.out.push_str("<params>\n");
    }

    pub fn end_params(&mut self) {
        self.out.push_str("</params>\n");
    }

    pub fn begin_param(&mut self) {
        self.out.push_str("<param>\n");
    }

    pub fn end_param(&mut self) {
        self.out.push_str("</param>\n");
    }

    pub fn write_value(&mut self, value: &Value) -> Result<(), SerializeError> {
        match value {
            Value::Null => self.out.push_str("<value><nil/></value>"),
            Value::Bool(b) => {
                self.out.push_str("<value><boolean>");
                self.out.push(if *b { '1' } else { '0' });
                self.out.push_str("</boolean></value>\n");
            }
            Value::Number(n) => self.write_number(n)?,
            Value::String(s) => {
                self.out.push_str("<value><string>");
                self.write_escaped(s);
                self.out.push_str("</string></value>\n");
            }
            Value::Array(items) => {
                self.out.push_str("<value><array><data>\n");
                for item in items {
                    self.write_value(item)?;
                }
                self.out.push_str("</data></array></value>\n");
            }
            Value::Object(map) => self.write_struct(map)?,
        }
        Ok(())
    }

    pub fn write_struct(&mut self, map: &Map<String, Value>) -> Result<(), SerializeError> {
        self.out.push_str("<value><struct>\n");
        for (name, value) in map {
            self.out.push_str("<member>\n<name>");
            self.write_escaped(name);
            self.out.push_str("</name>\n");
            self.write_value(value)?;
            self.out.push_str("</member>\n");
        }
        self.out.push_str("</struct></value>\n");
        Ok(())
    }

    fn write_number(&mut self, n: &Number) -> Result<(), SerializeError> {
        if n.is_f64() {
            // serde_json never stores non-finite floats.
            let f = n.as_f64().unwrap_or_default();
            let mut text = f.to_string();
            if !text.contains('.') {
                text.push_str(".0");
            }
            self.out.push_str("<value><double>");
            self.out.push_str(&text);
            self.out.push_str("</double></value>\n");
            return Ok(());
        }

        let int = n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .ok_or_else(|| SerializeError::IntegerOverflow(n.clone()))?;
        self.out.push_str("<value><int>");
        self.out.push_str(&int.to_string());
        self.out.push_str("</int></value>\n");
        Ok(())
    }

    fn write_escaped(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '&' => self.out.push_str("&amp;"),
                '<' => self.out.push_str("&lt;"),
                '>' => self.out.push_str("&gt;"),
                c => self.out.push(c),
            }
        }
    }
}

/// Encode `params` as a complete `<params>` envelope.
pub fn encode_params(params: &[Value]) -> Result<String, SerializeError> {
    let mut encoder = XmlRpcEncoder::new();
    encoder.begin_params();
    for param in params {
        encoder.begin_param();
        encoder.write_value(param)?;
        encoder.end_param();
    }
    encoder.end_params();
    Ok(encoder.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(value: Value) -> String {
        let mut e = XmlRpcEncoder::new();
        e.write_value(&value).unwrap();
        e.into_string()
    }

    #[test]
    fn scalars() {
        assert_eq!(encode(json!(true)), "<value><boolean>1</boolean></value>\n");
        assert_eq!(encode(json!(-7)), "<value><int>-7</int></value>\n");
        assert_eq!(encode(json!(1.0)), "<value><double>1.0</double></value>\n");
        assert_eq!(encode(json!(0.5)), "<value><double>0.5</double></value>\n");
        assert_eq!(encode(json!("a<b")), "<value><string>a&lt;b</string></value>\n");
        assert_eq!(encode(Value::Null), "<value><nil/></value>");
    }

    #[test]
    fn arrays_wrap_values_in_data() {
        assert_eq!(
            encode(json!([1, "x"])),
            "<value><array><data>\n<value><int>1</int></value>\n\
             <value><string>x</string></value>\n</data></array></value>\n"
        );
    }

    #[test]
    fn i32_bounds() {
        assert!(encode_params(&[json!(i32::MAX)]).is_ok());
        assert!(encode_params(&[json!(i32::MIN)]).is_ok());
        assert!(encode_params(&[json!(i64::from(i32::MIN) - 1)]).is_err());
        assert!(encode_params(&[json!(u64::MAX)]).is_err());
    }

    #[test]
    fn multiple_params() {
        let xml = encode_params(&[json!(1), json!(2)]).unwrap();
        assert_eq!(xml.matches("<param>").count(), 2);
        assert!(xml.starts_with("<params>\n") && xml.ends_with("</params>\n"));
    }
}
