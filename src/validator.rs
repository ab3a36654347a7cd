//! Read-only SQL policy check.
//!
//! A statement is accepted only when its leading keyword is `SELECT` (a
//! `WITH` CTE prefix is allowed) and no forbidden write/DDL keyword appears
//! anywhere in it as a whole word. The check is a text filter, not a SQL
//! parser: string literals and comments are stripped before matching, so a
//! literal containing "delete" does not cause a false rejection, while a
//! write statement hidden behind a comment is still caught.

use crate::error::GatewayError;

/// Keywords that always reject a statement, matched as whole words,
/// case-insensitively, after literals and comments have been removed.
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "TRUNCATE", "ALTER", "CREATE", "GRANT", "REVOKE",
];

/// Validate raw SQL text against the read-only policy.
pub fn validate(sql: &str) -> Result<(), GatewayError> {
    let stripped = strip_literals_and_comments(sql);
    let trimmed = stripped.trim();

    if trimmed.is_empty() {
        return Err(GatewayError::Rejected("Empty SQL statement".to_string()));
    }

    let leading = leading_keyword(trimmed);
    if !leading.eq_ignore_ascii_case("SELECT") && !leading.eq_ignore_ascii_case("WITH") {
        return Err(GatewayError::Rejected(
            "Only SELECT queries are allowed for security reasons".to_string(),
        ));
    }

    if let Some(keyword) = find_forbidden_keyword(&stripped) {
        return Err(GatewayError::Rejected(format!(
            "Query contains forbidden keyword: {keyword}"
        )));
    }

    Ok(())
}

/// First word of the statement, used for the leading-keyword check.
fn leading_keyword(sql: &str) -> &str {
    let end = sql
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(sql.len());
    &sql[..end]
}

/// Scan for the first forbidden keyword appearing as a whole word.
///
/// Words are maximal runs of `[A-Za-z0-9_]`, so identifiers like
/// `created_at` or `last_update_ts` never match.
fn find_forbidden_keyword(sql: &str) -> Option<&'static str> {
    let bytes = sql.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if is_word_byte(bytes[i]) {
            let start = i;
            while i < bytes.len() && is_word_byte(bytes[i]) {
                i += 1;
            }
            let word = &sql[start..i];
            for keyword in FORBIDDEN_KEYWORDS {
                if word.eq_ignore_ascii_case(keyword) {
                    return Some(keyword);
                }
            }
        } else {
            i += 1;
        }
    }
    None
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Replace string literals and comments with spaces so keyword matching
/// never looks inside them. Handles:
///   - single-quoted literals with `''` escaping
///   - dollar-quoted literals (`$$...$$`, `$tag$...$tag$`)
///   - `--` line comments
///   - `/* ... */` block comments, nested per the Postgres dialect
///
/// Double-quoted identifiers are deliberately left in place: an identifier
/// that *is* a forbidden keyword still rejects, which errs on the side of
/// refusing a query rather than letting one through.
fn strip_literals_and_comments(sql: &str) -> String {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Line comment
        if c == '-' && chars.get(i + 1) == Some(&'-') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            out.push(' ');
            continue;
        }

        // Block comment, may nest
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            let mut depth = 1;
            i += 2;
            while i < chars.len() && depth > 0 {
                if chars[i] == '/' && chars.get(i + 1) == Some(&'*') {
                    depth += 1;
                    i += 2;
                } else if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                    depth -= 1;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            out.push(' ');
            continue;
        }

        // Single-quoted literal, '' escapes a quote
        if c == '\'' {
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                i += 1;
            }
            out.push(' ');
            continue;
        }

        // Dollar-quoted literal
        if c == '$' {
            if let Some(tag_len) = dollar_tag_length(&chars[i..]) {
                let tag: String = chars[i..i + tag_len].iter().collect();
                i += tag_len;
                // Find the closing tag
                while i < chars.len() {
                    if chars[i] == '$' && matches_tag(&chars[i..], &tag) {
                        i += tag_len;
                        break;
                    }
                    i += 1;
                }
                out.push(' ');
                continue;
            }
        }

        out.push(c);
        i += 1;
    }

    out
}

/// Length of a dollar-quote opener (`$$` or `$tag$`) starting at `chars[0]`,
/// or `None` when `$` does not open a quote (e.g. a `$1` placeholder).
fn dollar_tag_length(chars: &[char]) -> Option<usize> {
    debug_assert_eq!(chars.first(), Some(&'$'));
    let mut j = 1;
    while j < chars.len() {
        let c = chars[j];
        if c == '$' {
            return Some(j + 1);
        }
        if !(c.is_ascii_alphanumeric() || c == '_') || c.is_ascii_digit() && j == 1 {
            return None;
        }
        j += 1;
    }
    None
}

fn matches_tag(chars: &[char], tag: &str) -> bool {
    let tag_chars: Vec<char> = tag.chars().collect();
    chars.len() >= tag_chars.len() && chars[..tag_chars.len()] == tag_chars[..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejection(sql: &str) -> String {
        match validate(sql) {
            Err(GatewayError::Rejected(reason)) => reason,
            other => panic!("expected rejection for {sql:?}, got {other:?}"),
        }
    }

    #[test]
    fn accepts_plain_select() {
        assert!(validate("SELECT * FROM dict_currencies LIMIT 5").is_ok());
        assert!(validate("  select id, name from users  ").is_ok());
        assert!(validate("SELECT 1").is_ok());
    }

    #[test]
    fn accepts_cte_select() {
        assert!(validate("WITH recent AS (SELECT * FROM orders) SELECT count(*) FROM recent").is_ok());
        assert!(validate("with t as (select 1 as n) select n from t").is_ok());
    }

    #[test]
    fn rejects_non_select() {
        let reason = rejection("EXPLAIN SELECT 1");
        assert!(reason.contains("Only SELECT"));
        assert!(rejection("SHOW search_path").contains("Only SELECT"));
        assert!(rejection("VACUUM").contains("Only SELECT"));
    }

    #[test]
    fn rejects_empty_statement() {
        assert!(rejection("").contains("Empty"));
        assert!(rejection("   \n\t ").contains("Empty"));
        assert!(rejection("-- just a comment").contains("Empty"));
    }

    #[test]
    fn rejects_each_forbidden_keyword_citing_it() {
        let cases = [
            ("DELETE FROM dict_currencies WHERE id = 1", "DELETE"),
            ("INSERT INTO t VALUES (1)", "INSERT"),
            ("UPDATE t SET a = 1", "UPDATE"),
            ("DROP TABLE t", "DROP"),
            ("TRUNCATE t", "TRUNCATE"),
            ("ALTER TABLE t ADD COLUMN c int", "ALTER"),
            ("CREATE TABLE t (id int)", "CREATE"),
            ("GRANT ALL ON t TO bob", "GRANT"),
            ("REVOKE ALL ON t FROM bob", "REVOKE"),
        ];
        for (sql, keyword) in cases {
            let reason = rejection(sql);
            assert!(
                reason.contains(keyword),
                "expected {keyword} cited for {sql:?}, got {reason:?}"
            );
        }
    }

    #[test]
    fn rejects_write_smuggled_into_cte() {
        let reason = rejection("WITH gone AS (DELETE FROM t RETURNING *) SELECT * FROM gone");
        assert!(reason.contains("DELETE"));
    }

    #[test]
    fn rejects_write_after_semicolon() {
        let reason = rejection("SELECT 1; DROP TABLE users");
        assert!(reason.contains("DROP"));
    }

    #[test]
    fn keyword_inside_identifier_is_not_a_match() {
        assert!(validate("SELECT created_at, updated_at FROM events").is_ok());
        assert!(validate("SELECT dropped_frames FROM stats").is_ok());
        assert!(validate("SELECT last_update_ts FROM sync_state").is_ok());
        assert!(validate("SELECT * FROM grants_archive").is_ok());
    }

    #[test]
    fn keyword_inside_string_literal_is_exempt() {
        assert!(validate("SELECT * FROM audit WHERE action = 'delete'").is_ok());
        assert!(validate("SELECT 'DROP TABLE users' AS scary").is_ok());
        assert!(validate("SELECT * FROM log WHERE note = 'it''s an update'").is_ok());
        assert!(validate("SELECT $$insert into t$$ AS snippet").is_ok());
        assert!(validate("SELECT $body$create or replace$body$ AS src").is_ok());
    }

    #[test]
    fn keyword_hidden_behind_comment_still_rejects() {
        let reason = rejection("SELECT 1 /* harmless */ ; DELETE FROM t");
        assert!(reason.contains("DELETE"));
        // The comment itself is stripped, so it cannot whitelist anything.
        assert!(validate("SELECT 1 -- delete from t\n").is_ok());
        assert!(validate("SELECT 1 /* drop table t */").is_ok());
    }

    #[test]
    fn leading_comment_before_select_is_fine() {
        assert!(validate("-- currencies\nSELECT * FROM dict_currencies").is_ok());
        assert!(validate("/* header */ SELECT 1").is_ok());
    }

    #[test]
    fn nested_block_comments_are_stripped() {
        assert!(validate("SELECT 1 /* outer /* inner */ still comment */").is_ok());
    }

    #[test]
    fn dollar_placeholder_is_not_a_quote() {
        // `$1` must not swallow the rest of the statement.
        let reason = rejection("SELECT * FROM t WHERE id = $1; DELETE FROM t");
        assert!(reason.contains("DELETE"));
    }

    #[test]
    fn unterminated_literal_strips_to_end() {
        // A malformed literal cannot hide anything dangerous; whatever is
        // inside it is stripped through end-of-input.
        assert!(validate("SELECT 'unterminated delete").is_ok());
    }

    #[test]
    fn strip_preserves_word_boundaries() {
        let stripped = strip_literals_and_comments("SELECT'x'FROM t");
        assert!(stripped.contains("SELECT FROM"));
    }
}
