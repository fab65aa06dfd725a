use super::SheetInput;
use serde_json::Value;

/// Render the sheet as text: the header line, then every row's raw cells.
///
/// No type row is consumed and nothing is coerced or quoted. Values are joined
/// with `,` and lines with `\n`, without a trailing newline.
pub fn convert_csv(input: &SheetInput<'_>) -> Value {
    let mut lines = Vec::with_capacity(input.rows.len() + 1);
    lines.push(input.header.join(","));
    for row in input.rows {
        let fields: Vec<String> = input
            .header
            .iter()
            .map(|column| row.get(column).map(|cell| cell.to_raw_string()).unwrap_or_default())
            .collect();
        lines.push(fields.join(","));
    }
    Value::String(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::test_support::{header, rows};
    use sheetsync_sheet::{CellValue, RawRow};

    #[test]
    fn test_quotes_are_kept_verbatim() {
        let header = header(&["quote"]);
        let rows = rows(&[&[("quote", "say \"hi\"")]]);
        let input = SheetInput {
            name: "lines",
            header: &header,
            rows: &rows,
            key: None,
        };

        assert_eq!(convert_csv(&input), Value::String("quote\nsay \"hi\"".to_string()));
    }

    #[test]
    fn test_raw_rows_as_csv() {
        let header = header(&["id", "name", "score"]);
        let mut rows = rows(&[
            &[("id", "1"), ("name", "Alice")],
            &[("id", "2"), ("name", "Smith, Bob")],
        ]);
        rows[0].insert("score".to_string(), CellValue::Number(9.5));
        let mut flagged = RawRow::new();
        flagged.insert("id".to_string(), CellValue::Bool(true));
        rows.push(flagged);

        let input = SheetInput {
            name: "scores",
            header: &header,
            rows: &rows,
            key: None,
        };

        let result = convert_csv(&input);
        assert_eq!(
            result,
            Value::String("id,name,score\n1,Alice,9.5\n2,Smith, Bob,\ntrue,,".to_string())
        );
    }
}
