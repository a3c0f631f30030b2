//! Splits a single-line MySQL `INSERT ... VALUES (...), (...);` dump
//! statement into its tuples and columns, the way the MediaWiki SQL
//! dumps (`page.sql`, `redirect.sql`, `page_props.sql`) are shipped.

/// One parsed SQL value: `None` for `NULL` or an empty literal,
/// `Some` for anything else with surrounding quotes stripped and
/// `\`-escapes resolved.
pub type SqlValue = Option<String>;

/// Parse every `(col, col, ...)` tuple out of an `INSERT ... VALUES`
/// line. Lines without a `` ` VALUES `` marker yield no tuples.
///
/// Quoting follows MySQL's dump convention: values are either bare
/// (numbers, `NULL`) or single-quoted with `\`-escaping; commas and
/// parentheses inside a quoted value are not tuple delimiters.
#[must_use]
pub fn parse_sql_values(line: &str) -> Vec<Vec<SqlValue>> {
    let marker = "` VALUES ";
    let Some(start) = line.find(marker) else {
        return Vec::new();
    };
    let body = &line[start + marker.len()..];

    let mut tuples = Vec::new();
    let mut current: Vec<SqlValue> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut escape = false;
    let mut depth: u32 = 0;

    for c in body.chars() {
        if in_quotes {
            if escape {
                field.push(c);
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '\'' {
                in_quotes = false;
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '\'' => in_quotes = true,
            '(' if depth == 0 => depth = 1,
            ')' if depth == 1 => {
                depth = 0;
                push_field(&mut current, &mut field);
                tuples.push(std::mem::take(&mut current));
            }
            ',' if depth == 1 => push_field(&mut current, &mut field),
            ';' | '\n' | '\r' => {}
            ' ' if depth == 0 => {}
            _ => field.push(c),
        }
    }
    tuples
}

fn push_field(tuple: &mut Vec<SqlValue>, field: &mut String) {
    let value = std::mem::take(field);
    if value.is_empty() || value == "NULL" {
        tuple.push(None);
    } else {
        tuple.push(Some(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_tuple() {
        let line = "INSERT INTO `page` VALUES (1,0,'Tokyo',0,0,0.1,'20220101',NULL,1024,0,'wikitext',NULL);";
        let tuples = parse_sql_values(line);
        assert_eq!(tuples.len(), 1);
        assert_eq!(tuples[0][0].as_deref(), Some("1"));
        assert_eq!(tuples[0][2].as_deref(), Some("Tokyo"));
        assert_eq!(tuples[0][7], None);
    }

    #[test]
    fn parses_multiple_tuples() {
        let line = "INSERT INTO `redirect` VALUES (1,0,'Foo',''),(2,0,'Bar','');";
        let tuples = parse_sql_values(line);
        assert_eq!(tuples.len(), 2);
        assert_eq!(tuples[0][2].as_deref(), Some("Foo"));
        assert_eq!(tuples[1][2].as_deref(), Some("Bar"));
    }

    #[test]
    fn handles_escaped_quotes_and_commas_inside_values() {
        let line = r"INSERT INTO `page` VALUES (1,0,'O\'Brien, Jr.',0);";
        let tuples = parse_sql_values(line);
        assert_eq!(tuples.len(), 1);
        assert_eq!(tuples[0][2].as_deref(), Some("O'Brien, Jr."));
    }

    #[test]
    fn line_without_values_marker_yields_nothing() {
        assert!(parse_sql_values("CREATE TABLE `page` (...);").is_empty());
    }
}
