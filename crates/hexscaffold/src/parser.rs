//! Line-oriented `CREATE TABLE` parser.
//!
//! Recognizes a subset of SQL DDL, one declaration per line:
//! ```text
//! CREATE TABLE [IF NOT EXISTS] [schema.]name (
//!     column TYPE [PRIMARY KEY] [NOT NULL] [DEFAULT literal] ...,
//!     CONSTRAINT ... | PRIMARY KEY (...) | FOREIGN KEY ... | UNIQUE ... | CHECK ... | INDEX ...
//! );
//! ```
//! The opening parenthesis may also start the line after the header.
//! Lines inside a table block that cannot be split into a name and a type
//! are dropped and reported in [`ParseReport::dropped`], as are table
//! headers that never open a column list.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::typemap;
use crate::types::{Column, ScaffoldError, ScaffoldResult, Schema, Table};

/// Two-token types merged into one source type.
const MULTI_WORD_TYPES: &[(&str, &str)] = &[("DOUBLE", "PRECISION"), ("CHARACTER", "VARYING")];

/// Single-token clauses that start a table-level constraint line.
const CONSTRAINT_KEYWORDS: &[&str] = &["CONSTRAINT", "UNIQUE", "CHECK", "INDEX"];

/// Two-token clauses that start a table-level constraint line.
const CONSTRAINT_PAIRS: &[(&str, &str)] = &[("PRIMARY", "KEY"), ("FOREIGN", "KEY")];

/// Outcome of parsing: the schema plus every column line that was lost.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseReport {
    pub schema: Schema,
    pub dropped: Vec<DroppedLine>,
}

/// A line that could not be turned into part of the schema: a column line
/// that has no name and type, or a table header with no column list.
/// `table` is empty when not even the table name could be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedLine {
    pub table: String,
    pub line: usize,
    pub text: String,
}

impl DroppedLine {
    /// `table:line`, or `line N` when no table name was read.
    pub fn location(&self) -> String {
        if self.table.is_empty() {
            format!("line {}", self.line)
        } else {
            format!("{}:{}", self.table, self.line)
        }
    }
}

struct OpenTable {
    name: String,
    line: usize,
    columns: Vec<Column>,
}

fn create_table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?i)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:["`]?\w+["`]?\.)?["`]?(\w+)["`]?\s*\("#,
        )
        .expect("create table regex is valid")
    })
}

/// A complete table header without its opening parenthesis.
fn create_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?i)^CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:["`]?\w+["`]?\.)?["`]?(\w+)["`]?$"#,
        )
        .expect("create header regex is valid")
    })
}

fn create_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^CREATE\s+TABLE\b").expect("create keyword regex is valid"))
}

fn default_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bDEFAULT\s+([^,\s]+)").expect("default regex is valid"))
}

/// Parse a schema file from disk.
pub fn parse_file(path: &Path) -> ScaffoldResult<ParseReport> {
    let text = std::fs::read_to_string(path).map_err(|source| ScaffoldError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

/// Parse schema text into an ordered set of tables.
pub fn parse(text: &str) -> ScaffoldResult<ParseReport> {
    let mut report = ParseReport::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut current: Option<OpenTable> = None;
    // A `CREATE TABLE name` header whose `(` is expected on the next line.
    let mut pending: Option<(String, usize, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || is_comment(line) {
            continue;
        }

        if let Some((name, header_line, header)) = pending.take() {
            if let Some(rest) = line.strip_prefix('(') {
                current = begin_table(name, header_line, rest.trim(), line_no, &mut report);
                continue;
            }
            seen.remove(&name.to_lowercase());
            drop_header(name, header_line, header, &mut report.dropped);
        }

        if let Some(caps) = create_table_re().captures(line) {
            let name = claim_table(&caps[1], &mut seen, current.take())?;
            // Anything after the opening parenthesis on the same line.
            let rest = &line[caps.get(0).map_or(line.len(), |m| m.end())..];
            current = begin_table(name, line_no, rest, line_no, &mut report);
            continue;
        }

        if let Some(caps) = create_header_re().captures(line) {
            let name = claim_table(&caps[1], &mut seen, current.take())?;
            pending = Some((name, line_no, line.to_string()));
            continue;
        }

        if create_keyword_re().is_match(line) {
            if let Some(open) = current.take() {
                return Err(ScaffoldError::UnterminatedTable {
                    table: open.name,
                    line: open.line,
                });
            }
            tracing::warn!(line = line_no, "ignoring unrecognized table declaration: {line}");
            report.dropped.push(DroppedLine {
                table: String::new(),
                line: line_no,
                text: line.to_string(),
            });
            continue;
        }

        let Some(open) = current.as_mut() else {
            continue;
        };

        let (body, closes) = split_closing(line);
        if !body.is_empty() {
            push_column(open, body, line_no, &mut report.dropped);
        }
        if closes {
            if let Some(open) = current.take() {
                report.schema.tables.push(finish(open));
            }
        }
    }

    if let Some((name, header_line, header)) = pending {
        drop_header(name, header_line, header, &mut report.dropped);
    }

    if let Some(open) = current {
        return Err(ScaffoldError::UnterminatedTable {
            table: open.name,
            line: open.line,
        });
    }

    tracing::info!(
        "parsed {} table(s), {} column(s)",
        report.schema.len(),
        report.schema.column_count()
    );
    if !report.dropped.is_empty() {
        tracing::warn!(
            "{} line(s) could not be parsed and were dropped",
            report.dropped.len()
        );
    }

    Ok(report)
}

/// Register a new table name. A table still open at this point never closed.
fn claim_table(
    name: &str,
    seen: &mut HashSet<String>,
    open: Option<OpenTable>,
) -> ScaffoldResult<String> {
    if let Some(open) = open {
        return Err(ScaffoldError::UnterminatedTable {
            table: open.name,
            line: open.line,
        });
    }
    if !seen.insert(name.to_lowercase()) {
        return Err(ScaffoldError::DuplicateTable(name.to_string()));
    }
    Ok(name.to_string())
}

/// Open a table block. `rest` is the text after its opening parenthesis,
/// found on line `line_no`. Returns the table if it is still open.
fn begin_table(
    name: String,
    header_line: usize,
    rest: &str,
    line_no: usize,
    report: &mut ParseReport,
) -> Option<OpenTable> {
    let mut open = OpenTable {
        name,
        line: header_line,
        columns: Vec::new(),
    };
    let (body, closes) = split_closing(rest);
    if !body.is_empty() {
        push_column(&mut open, body, line_no, &mut report.dropped);
    }
    if closes {
        report.schema.tables.push(finish(open));
        None
    } else {
        Some(open)
    }
}

fn drop_header(name: String, line: usize, text: String, dropped: &mut Vec<DroppedLine>) {
    tracing::warn!(
        table = %name,
        line,
        "table header is not followed by a column list, dropping table"
    );
    dropped.push(DroppedLine {
        table: name,
        line,
        text,
    });
}

fn finish(open: OpenTable) -> Table {
    tracing::debug!("table {} ({} columns)", open.name, open.columns.len());
    Table {
        name: open.name,
        columns: open.columns,
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with("--") || line.starts_with("/*") || line.starts_with('*')
}

/// Split a line at the table terminator. Returns the text before it and
/// whether the table closes on this line.
fn split_closing(line: &str) -> (&str, bool) {
    if let Some(pos) = line.find(");") {
        return (line[..pos].trim(), true);
    }
    if line.starts_with(')') {
        return ("", true);
    }
    (line, false)
}

fn push_column(open: &mut OpenTable, line: &str, line_no: usize, dropped: &mut Vec<DroppedLine>) {
    if is_constraint_line(line) {
        return;
    }
    match parse_column(line) {
        Some(column) => open.columns.push(column),
        None => {
            tracing::warn!(
                table = %open.name,
                line = line_no,
                "dropping unparseable column line: {line}"
            );
            dropped.push(DroppedLine {
                table: open.name.clone(),
                line: line_no,
                text: line.to_string(),
            });
        }
    }
}

/// Leading identifier run of a token, uppercased: `UNIQUE(email)` → `UNIQUE`.
fn keyword(token: &str) -> String {
    token
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_uppercase()
}

/// A table-level constraint clause, as opposed to a column with inline modifiers.
pub fn is_constraint_line(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return false;
    };
    let first_kw = keyword(first);
    if first_kw.is_empty() {
        return false;
    }
    if CONSTRAINT_KEYWORDS.contains(&first_kw.as_str()) {
        return true;
    }
    // `PRIMARY KEY(id)` splits into `PRIMARY` / `KEY(id)`; `PRIMARY` alone may be a column.
    let second_kw = tokens.next().map(keyword).unwrap_or_default();
    CONSTRAINT_PAIRS
        .iter()
        .any(|(a, b)| first_kw == *a && second_kw == *b)
}

/// Decompose one column line. Returns `None` when no name and type can be found.
pub fn parse_column(line: &str) -> Option<Column> {
    let line = line.trim().trim_end_matches(',').trim();
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }

    let quoted = tokens[0].starts_with(['"', '`', '[']);
    let name = tokens[0].trim_matches(|c| matches!(c, '"' | '`' | '[' | ']'));
    if name.is_empty() {
        return None;
    }

    // `NUMERIC(10, 2)` spans tokens until its parentheses balance.
    let mut source_type = tokens[1].to_string();
    let mut next = 2;
    while paren_depth(&source_type) > 0 {
        let Some(token) = tokens.get(next) else {
            break;
        };
        source_type.push(' ');
        source_type.push_str(token);
        next += 1;
    }
    let mut source_type = source_type.trim_end_matches(',').to_string();

    if let Some(token) = tokens.get(next) {
        let first = source_type.to_uppercase();
        let second = keyword(token);
        if MULTI_WORD_TYPES
            .iter()
            .any(|(a, b)| first == *a && second == *b)
        {
            source_type = format!("{source_type} {}", token.trim_end_matches(','));
            next += 1;
        }
    }

    let modifiers = tokens[next..].join(" ");
    let upper = modifiers.to_uppercase();
    let is_primary_key = upper.contains("PRIMARY KEY");
    let is_nullable = !upper.contains("NOT NULL");
    let default_value = default_re()
        .captures(&modifiers)
        .map(|caps| caps[1].to_string());

    let mapping = typemap::map_forward(&source_type, name, is_primary_key, is_nullable);

    Some(Column {
        name: name.to_string(),
        quoted,
        source_type,
        is_primary_key,
        is_nullable,
        default_value,
        mapping,
    })
}

fn paren_depth(text: &str) -> i32 {
    text.chars().fold(0, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typemap::TargetType;

    const USERS: &str = r#"
-- users table
CREATE TABLE users (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) UNIQUE NOT NULL,
    score DOUBLE PRECISION,
    created_at TIMESTAMPTZ DEFAULT NOW()
);
"#;

    #[test]
    fn test_parse_single_table() {
        let report = parse(USERS).unwrap();
        assert_eq!(report.schema.len(), 1);
        assert!(report.dropped.is_empty());

        let table = &report.schema.tables[0];
        assert_eq!(table.name, "users");
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "email", "score", "created_at"]);
    }

    #[test]
    fn test_column_flags() {
        let report = parse(USERS).unwrap();
        let table = &report.schema.tables[0];

        let id = table.column("id").unwrap();
        assert!(id.is_primary_key);
        assert!(id.is_nullable);
        assert_eq!(id.mapping.target, TargetType::Int64);

        let email = table.column("email").unwrap();
        assert!(!email.is_nullable);
        assert!(!email.is_primary_key);
        assert_eq!(email.source_type, "VARCHAR(255)");

        let score = table.column("score").unwrap();
        assert_eq!(score.source_type, "DOUBLE PRECISION");
        assert_eq!(score.mapping.target, TargetType::Float64);

        let created = table.column("created_at").unwrap();
        assert_eq!(created.default_value.as_deref(), Some("NOW()"));
        assert_eq!(created.mapping.target, TargetType::Time);
    }

    #[test]
    fn test_constraint_lines_skipped() {
        let sql = r#"
CREATE TABLE posts (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL,
    unique_code TEXT,
    CONSTRAINT fk_user FOREIGN KEY (user_id) REFERENCES users(id),
    PRIMARY KEY (id),
    FOREIGN KEY (user_id) REFERENCES users(id),
    UNIQUE (unique_code),
    CHECK (user_id > 0),
    INDEX idx_user (user_id)
);
"#;
        let report = parse(sql).unwrap();
        let table = &report.schema.tables[0];
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "user_id", "unique_code"]);
        assert!(report.dropped.is_empty());
    }

    #[test]
    fn test_is_constraint_line() {
        assert!(is_constraint_line("PRIMARY KEY(id)"));
        assert!(is_constraint_line("unique (email)"));
        assert!(is_constraint_line("CONSTRAINT pk PRIMARY KEY (id)"));
        assert!(!is_constraint_line("email TEXT UNIQUE NOT NULL"));
        assert!(!is_constraint_line("id INT PRIMARY KEY"));
        assert!(!is_constraint_line("primary_contact TEXT"));
        assert!(!is_constraint_line("\"check\" TEXT"));
    }

    #[test]
    fn test_tables_in_source_order() {
        let sql = "CREATE TABLE accounts (\n id BIGSERIAL PRIMARY KEY\n);\n\
                   create table IF NOT EXISTS app.sessions (\n account_id BIGINT\n);\n";
        let report = parse(sql).unwrap();
        let names: Vec<&str> = report
            .schema
            .tables
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["accounts", "sessions"]);
    }

    #[test]
    fn test_dropped_lines_are_reported() {
        let sql =
            "CREATE TABLE things (\n    id BIGSERIAL PRIMARY KEY,\n    orphan,\n    label TEXT\n);";
        let report = parse(sql).unwrap();
        assert_eq!(report.schema.tables[0].columns.len(), 2);
        assert_eq!(
            report.dropped,
            vec![DroppedLine {
                table: "things".to_string(),
                line: 3,
                text: "orphan,".to_string(),
            }]
        );
    }

    #[test]
    fn test_column_on_closing_line() {
        let sql = "CREATE TABLE events (\n    id BIGSERIAL PRIMARY KEY,\n    \
                   happened_at TIMESTAMP DEFAULT NOW());";
        let report = parse(sql).unwrap();
        let table = &report.schema.tables[0];
        assert_eq!(table.columns.len(), 2);
        assert_eq!(
            table.column("happened_at").unwrap().default_value.as_deref(),
            Some("NOW()")
        );
    }

    #[test]
    fn test_mysql_style_closing_line() {
        let sql = "CREATE TABLE logs (\n  id INT PRIMARY KEY,\n  msg TEXT\n) ENGINE=InnoDB;";
        let report = parse(sql).unwrap();
        assert_eq!(report.schema.tables[0].columns.len(), 2);
    }

    #[test]
    fn test_default_stops_at_comma() {
        let col = parse_column("is_active BOOLEAN DEFAULT TRUE,").unwrap();
        assert_eq!(col.default_value.as_deref(), Some("TRUE"));
        assert_eq!(col.source_type, "BOOLEAN");
    }

    #[test]
    fn test_quoted_column_name() {
        let col = parse_column("\"order\" INTEGER NOT NULL").unwrap();
        assert_eq!(col.name, "order");
        assert!(col.quoted);
        assert!(!col.is_nullable);

        assert!(!parse_column("total INTEGER").unwrap().quoted);
    }

    #[test]
    fn test_type_with_spaced_arguments() {
        let col = parse_column("price NUMERIC(10, 2) NOT NULL DEFAULT 0,").unwrap();
        assert_eq!(col.source_type, "NUMERIC(10, 2)");
        assert!(!col.is_nullable);
        assert_eq!(col.default_value.as_deref(), Some("0"));
        assert_eq!(col.mapping.target, TargetType::Float64);

        let col = parse_column("amount DECIMAL( 12 , 4 )").unwrap();
        assert_eq!(col.source_type, "DECIMAL( 12 , 4 )");
        assert!(col.is_nullable);
    }

    #[test]
    fn test_open_paren_on_next_line() {
        let sql = "CREATE TABLE users\n(\n    id BIGSERIAL PRIMARY KEY,\n    name TEXT\n);\n\
                   CREATE TABLE IF NOT EXISTS app.tags\n( label TEXT );";
        let report = parse(sql).unwrap();
        assert!(report.dropped.is_empty());
        assert_eq!(report.schema.len(), 2);
        assert_eq!(report.schema.tables[0].name, "users");
        assert_eq!(report.schema.tables[0].columns.len(), 2);
        assert_eq!(report.schema.tables[1].name, "tags");
        assert!(report.schema.tables[1].has_column("label"));
    }

    #[test]
    fn test_header_without_column_list_is_reported() {
        let sql =
            "CREATE TABLE ghosts\nCREATE TABLE real (\n x TEXT\n);\nCREATE TABLE AS SELECT 1;";
        let report = parse(sql).unwrap();
        assert_eq!(report.schema.len(), 1);
        assert_eq!(report.schema.tables[0].name, "real");
        assert_eq!(
            report.dropped,
            vec![
                DroppedLine {
                    table: "ghosts".to_string(),
                    line: 1,
                    text: "CREATE TABLE ghosts".to_string(),
                },
                DroppedLine {
                    table: String::new(),
                    line: 5,
                    text: "CREATE TABLE AS SELECT 1;".to_string(),
                },
            ]
        );
        assert_eq!(report.dropped[1].location(), "line 5");
    }

    #[test]
    fn test_trailing_header_is_reported() {
        let report = parse("CREATE TABLE later").unwrap();
        assert!(report.schema.is_empty());
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].table, "later");
        assert_eq!(report.dropped[0].location(), "later:1");
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let sql = "/* header */\n-- note\n\nCREATE TABLE a (\n-- inline note\n  x TEXT\n);";
        let report = parse(sql).unwrap();
        assert_eq!(report.schema.tables[0].columns.len(), 1);
    }

    #[test]
    fn test_empty_input_yields_no_tables() {
        let report = parse("").unwrap();
        assert!(report.schema.is_empty());
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let sql = "CREATE TABLE a (\n x TEXT\n);\nCREATE TABLE A (\n y TEXT\n);";
        let err = parse(sql).unwrap_err();
        assert!(matches!(err, ScaffoldError::DuplicateTable(ref n) if n == "A"));
    }

    #[test]
    fn test_unterminated_table_rejected() {
        let sql = "CREATE TABLE a (\n x TEXT\n";
        let err = parse(sql).unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::UnterminatedTable { ref table, line: 1 } if table == "a"
        ));
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file(Path::new("/definitely/not/here.sql")).unwrap_err();
        assert!(matches!(err, ScaffoldError::Io { .. }));
    }
}
