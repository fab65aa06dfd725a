//! Typed parsing of single cells.
//!
//! Every rule here mirrors how the workbooks were authored against a
//! spreadsheet scripting runtime: numbers follow `parseInt`/`parseFloat`
//! prefix parsing, falsy cells fall back to a neutral value, and anything
//! that cannot be represented in JSON (`NaN`, infinities) becomes `null`.

use crate::error::{ConvertError, ConvertResult};
use crate::path;
use crate::store::SheetStore;
use crate::types::{ElementType, TypeDescriptor};
use serde_json::Value;
use sheetsync_sheet::CellValue;

/// Coerce one raw cell to its declared type.
///
/// `column` is the label used in error messages (`sheet:column`) and `row`
/// the index of the data row. `Ok(None)` means the attribute is absent and
/// must be left out of the output object.
///
/// # Example
/// ```
/// use sheetsync_convert::{coerce, SheetStore, TypeDescriptor};
/// use sheetsync_sheet::CellValue;
///
/// let store = SheetStore::new();
/// let value = coerce(&store, "items:tags", &TypeDescriptor::parse("array.int").unwrap(), 0, &"[1,2,3]".into());
/// assert_eq!(value.unwrap(), Some(serde_json::json!([1, 2, 3])));
///
/// assert!(coerce(&store, "items:ok", &TypeDescriptor::Bool, 0, &CellValue::Empty).unwrap().is_none());
/// ```
pub fn coerce(
    store: &SheetStore,
    column: &str,
    descriptor: &TypeDescriptor,
    row: usize,
    raw: &CellValue,
) -> ConvertResult<Option<Value>> {
    let value = match descriptor {
        TypeDescriptor::Ignore => None,
        TypeDescriptor::Any => match raw {
            CellValue::Empty => None,
            CellValue::Bool(b) => Some(Value::Bool(*b)),
            CellValue::Number(n) => Some(number_value(*n)),
            CellValue::Text(s) => Some(Value::String(s.clone())),
        },
        TypeDescriptor::String => Some(Value::String(raw.to_raw_string())),
        TypeDescriptor::Float => Some(coerce_float(raw)),
        TypeDescriptor::Int => Some(coerce_int(column, row, raw)?),
        TypeDescriptor::Bool => coerce_bool(column, row, raw)?,
        TypeDescriptor::Array(element) => Some(parse_array(column, *element, row, raw)?),
        TypeDescriptor::Json => coerce_json(column, row, raw)?,
        TypeDescriptor::Ref { sheet } => {
            if is_missing(raw) {
                return Ok(None);
            }
            let text = raw.to_raw_string();
            let (target, key) = reference_target(column, row, raw, sheet.as_deref(), &text)?;
            resolve(store, column, row, raw, target, key)?
        }
        TypeDescriptor::ArrayRef { sheet } => {
            if is_missing(raw) {
                return Ok(None);
            }
            let keys = parse_array(column, ElementType::String, row, raw)?;
            let Value::Array(keys) = keys else {
                return Ok(None);
            };

            let mut resolved = Vec::with_capacity(keys.len());
            for key in &keys {
                let text = key.as_str().unwrap_or_default();
                let (target, key) = reference_target(column, row, raw, sheet.as_deref(), text)?;
                resolved.push(resolve(store, column, row, raw, target, key)?.unwrap_or(Value::Null));
            }
            Some(Value::Array(resolved))
        }
    };
    Ok(value)
}

/// JSON value for a number: integral values become integers, values JSON
/// cannot hold become `null`.
#[must_use]
pub fn number_value(n: f64) -> Value {
    // 2^53, the largest range where every integer is exact
    const EXACT_INT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() <= EXACT_INT {
        return Value::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
}

fn is_missing(raw: &CellValue) -> bool {
    match raw {
        CellValue::Empty => true,
        CellValue::Text(s) => s.is_empty(),
        _ => false,
    }
}

fn coerce_float(raw: &CellValue) -> Value {
    if raw.is_falsy() {
        return Value::from(0);
    }
    match raw {
        CellValue::Number(n) => number_value(*n),
        other => number_value(parse_float(&other.to_raw_string())),
    }
}

fn coerce_int(column: &str, row: usize, raw: &CellValue) -> ConvertResult<Value> {
    if raw.is_falsy() {
        return Ok(Value::from(0));
    }
    let parsed = match raw {
        CellValue::Number(n) if n.is_finite() => Some(n.trunc()),
        other => parse_int(&other.to_raw_string()),
    };
    parsed
        .map(number_value)
        .ok_or_else(|| ConvertError::cell("Data is not of type integer", column, row, raw))
}

fn coerce_bool(column: &str, row: usize, raw: &CellValue) -> ConvertResult<Option<Value>> {
    match raw {
        CellValue::Empty => Ok(None),
        CellValue::Bool(b) => Ok(Some(Value::Bool(*b))),
        other if other.is_falsy() => Ok(Some(Value::Bool(false))),
        CellValue::Text(s) if s == "TRUE" => Ok(Some(Value::Bool(true))),
        CellValue::Text(s) if s == "FALSE" => Ok(Some(Value::Bool(false))),
        other => Err(ConvertError::cell(
            "Data is not of type boolean",
            column,
            row,
            other,
        )),
    }
}

fn coerce_json(column: &str, row: usize, raw: &CellValue) -> ConvertResult<Option<Value>> {
    if is_missing(raw) {
        return Ok(None);
    }
    serde_json::from_str(&raw.to_raw_string())
        .map(Some)
        .map_err(|_| ConvertError::cell("Unable to parse JSON", column, row, raw))
}

/// Parse a JSON array cell and check every element against `element`.
fn parse_array(
    column: &str,
    element: ElementType,
    row: usize,
    raw: &CellValue,
) -> ConvertResult<Value> {
    if raw.is_falsy() {
        return Ok(Value::Array(Vec::new()));
    }

    let parsed: Value = serde_json::from_str(&raw.to_raw_string())
        .map_err(|_| ConvertError::cell("Unable to parse JSON array", column, row, raw))?;
    let Value::Array(items) = parsed else {
        return Err(ConvertError::cell("Data is not of type array", column, row, raw));
    };

    if element == ElementType::Any {
        return Ok(Value::Array(items));
    }

    let mut checked = Vec::with_capacity(items.len());
    for item in items {
        let matches = match element {
            ElementType::Any => true,
            ElementType::Int | ElementType::Float => item.is_number(),
            ElementType::String => item.is_string(),
            ElementType::Bool => item.is_boolean(),
        };
        if !matches {
            return Err(ConvertError::cell(
                format!("Not an array of {element}"),
                column,
                row,
                raw,
            ));
        }

        if element == ElementType::Int {
            let n = item.as_f64().unwrap_or(f64::NAN);
            if n.fract() != 0.0 {
                return Err(ConvertError::cell("Array data type is invalid", column, row, raw));
            }
            checked.push(number_value(n));
        } else {
            checked.push(item);
        }
    }
    Ok(Value::Array(checked))
}

/// Split a reference into target sheet and key.
///
/// With a target from the descriptor the whole text is the key; otherwise the
/// text must read `sheet:key`.
fn reference_target<'a>(
    column: &str,
    row: usize,
    raw: &CellValue,
    sheet: Option<&'a str>,
    text: &'a str,
) -> ConvertResult<(&'a str, &'a str)> {
    match sheet {
        Some(sheet) => Ok((sheet, text)),
        None => text.split_once(':').ok_or_else(|| {
            ConvertError::cell("Reference must be of the form sheet:key", column, row, raw)
        }),
    }
}

fn resolve(
    store: &SheetStore,
    column: &str,
    row: usize,
    raw: &CellValue,
    sheet: &str,
    key: &str,
) -> ConvertResult<Option<Value>> {
    let target = store
        .get(sheet)
        .ok_or_else(|| ConvertError::missing_reference(sheet, column, row, raw))?;
    Ok(path::get(target, key).cloned())
}

/// `parseInt(text, 10)`: optional sign and the longest run of leading digits.
fn parse_int(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: f64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// `parseFloat(text)`: the longest prefix that reads as a decimal literal,
/// `NaN` when there is none.
fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i = 1;
    }
    if s[i..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let count_digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let int_digits = count_digits(i);
    i += int_digits;
    let mut mantissa_digits = int_digits;
    if bytes.get(i) == Some(&b'.') {
        let frac_digits = count_digits(i + 1);
        mantissa_digits += frac_digits;
        if mantissa_digits > 0 {
            i += 1 + frac_digits;
        }
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(j);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }

    s[..i].parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(descriptor: &str, raw: impl Into<CellValue>) -> ConvertResult<Option<Value>> {
        let store = SheetStore::new();
        let descriptor = TypeDescriptor::parse(descriptor).unwrap();
        coerce(&store, "sheet:col", &descriptor, 0, &raw.into())
    }

    fn ok(descriptor: &str, raw: impl Into<CellValue>) -> Option<Value> {
        run(descriptor, raw).unwrap()
    }

    #[test]
    fn test_any_passthrough() {
        assert_eq!(ok("any", "x"), Some(json!("x")));
        assert_eq!(ok("any", 2.5), Some(json!(2.5)));
        assert_eq!(ok("any", CellValue::Empty), None);
    }

    #[test]
    fn test_string() {
        assert_eq!(ok("string", CellValue::Empty), Some(json!("")));
        assert_eq!(ok("string", 12), Some(json!("12")));
        assert_eq!(ok("string", true), Some(json!("true")));
    }

    #[test]
    fn test_float() {
        assert_eq!(ok("float", CellValue::Empty), Some(json!(0)));
        assert_eq!(ok("float", "3.25kg"), Some(json!(3.25)));
        assert_eq!(ok("float", " -1e3"), Some(json!(-1000)));
        assert_eq!(ok("float", ".5"), Some(json!(0.5)));
        assert_eq!(ok("float", 7.5), Some(json!(7.5)));
        // NaN has no JSON form
        assert_eq!(ok("float", "abc"), Some(Value::Null));
        assert_eq!(ok("float", "Infinity"), Some(Value::Null));
    }

    #[test]
    fn test_int() {
        assert_eq!(ok("int", ""), Some(json!(0)));
        assert_eq!(ok("int", CellValue::Empty), Some(json!(0)));
        assert_eq!(ok("integer", "42"), Some(json!(42)));
        assert_eq!(ok("int", " -7 apples"), Some(json!(-7)));
        assert_eq!(ok("int", "3.9"), Some(json!(3)));
        assert_eq!(ok("int", 3.9), Some(json!(3)));
        assert!(matches!(run("int", "abc"), Err(ConvertError::Cell { .. })));
        assert!(run("int", true).is_err());
    }

    #[test]
    fn test_bool() {
        assert_eq!(ok("bool", CellValue::Empty), None);
        assert_eq!(ok("bool", "TRUE"), Some(json!(true)));
        assert_eq!(ok("boolean", "FALSE"), Some(json!(false)));
        assert_eq!(ok("bool", true), Some(json!(true)));
        assert_eq!(ok("bool", 0), Some(json!(false)));
        assert!(run("bool", "MAYBE").is_err());
        assert!(run("bool", "true").is_err());
    }

    #[test]
    fn test_arrays() {
        assert_eq!(ok("array", CellValue::Empty), Some(json!([])));
        assert_eq!(ok("array", r#"[1, "a", null]"#), Some(json!([1, "a", null])));
        assert_eq!(ok("array.int", "[1,2,3]"), Some(json!([1, 2, 3])));
        assert_eq!(ok("array.int", "[1.0]"), Some(json!([1])));
        assert_eq!(ok("array.float", "[1.5, 2]"), Some(json!([1.5, 2])));
        assert_eq!(ok("array.string", r#"["a"]"#), Some(json!(["a"])));
        assert_eq!(ok("array.bool", "[true]"), Some(json!([true])));
    }

    #[test]
    fn test_array_failures() {
        let message = |descriptor: &str, raw: &str| match run(descriptor, raw) {
            Err(ConvertError::Cell { message, .. }) => message,
            other => panic!("expected cell error, got {other:?}"),
        };
        assert_eq!(message("array.int", "[1.5]"), "Array data type is invalid");
        assert_eq!(message("array.int", r#"["1"]"#), "Not an array of number");
        assert_eq!(message("array.bool", "[1]"), "Not an array of boolean");
        assert_eq!(message("array", "[1,"), "Unable to parse JSON array");
        assert_eq!(message("array", r#"{"a":1}"#), "Data is not of type array");
    }

    #[test]
    fn test_json() {
        assert_eq!(ok("json", CellValue::Empty), None);
        assert_eq!(ok("json", r#"{"a":[1]}"#), Some(json!({"a": [1]})));
        assert_eq!(ok("json", 5), Some(json!(5)));
        assert!(run("json", "{oops").is_err());
    }

    fn store_with_units() -> SheetStore {
        [
            (
                "units".to_string(),
                json!({"archer": {"hp": 5}, "knight": {"hp": 9}}),
            ),
            ("names".to_string(), json!(["zero", "one"])),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_reference() {
        let store = store_with_units();
        let with_target = TypeDescriptor::parse("ref:units").unwrap();
        let value = coerce(&store, "a:b", &with_target, 0, &"archer".into()).unwrap();
        assert_eq!(value, Some(json!({"hp": 5})));

        let nested = coerce(&store, "a:b", &with_target, 0, &"knight.hp".into()).unwrap();
        assert_eq!(nested, Some(json!(9)));

        let inline = TypeDescriptor::parse("ref").unwrap();
        let value = coerce(&store, "a:b", &inline, 0, &"names:1".into()).unwrap();
        assert_eq!(value, Some(json!("one")));

        let missing_key = coerce(&store, "a:b", &with_target, 0, &"mage".into()).unwrap();
        assert_eq!(missing_key, None);

        assert_eq!(
            coerce(&store, "a:b", &with_target, 0, &CellValue::Empty).unwrap(),
            None
        );
    }

    #[test]
    fn test_reference_failures() {
        let store = store_with_units();
        let forward = TypeDescriptor::parse("ref:later").unwrap();
        let err = coerce(&store, "a:b", &forward, 2, &"x".into()).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MissingReference { ref sheet, row: 2, .. } if sheet == "later"
        ));

        let inline = TypeDescriptor::parse("reference").unwrap();
        assert!(matches!(
            coerce(&store, "a:b", &inline, 0, &"archer".into()),
            Err(ConvertError::Cell { .. })
        ));
    }

    #[test]
    fn test_array_reference() {
        let store = store_with_units();
        let descriptor = TypeDescriptor::parse("array.ref:units").unwrap();
        let value = coerce(&store, "a:b", &descriptor, 0, &r#"["knight","mage","archer"]"#.into())
            .unwrap();
        assert_eq!(value, Some(json!([{"hp": 9}, null, {"hp": 5}])));

        let inline = TypeDescriptor::parse("array.reference").unwrap();
        let value = coerce(&store, "a:b", &inline, 0, &r#"["names:0","units:archer.hp"]"#.into())
            .unwrap();
        assert_eq!(value, Some(json!(["zero", 5])));

        assert!(coerce(&store, "a:b", &descriptor, 0, &"[1]".into()).is_err());
        assert_eq!(
            coerce(&store, "a:b", &descriptor, 0, &CellValue::Empty).unwrap(),
            None
        );
    }

    #[test]
    fn test_number_value() {
        assert_eq!(number_value(3.0), json!(3));
        assert_eq!(number_value(-0.0), json!(0));
        assert_eq!(number_value(0.25), json!(0.25));
        assert_eq!(number_value(f64::NAN), Value::Null);
        assert_eq!(number_value(f64::INFINITY), Value::Null);
    }
}
