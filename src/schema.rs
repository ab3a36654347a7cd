//! Schema discovery over the store's catalogs.
//!
//! Read path independent of query execution: a paginated listing of the
//! caller-visible tables (the `public` schema, never system catalogs) and a
//! per-table drill-down with column, index, and comment metadata. Nothing
//! here is cached; descriptors are produced fresh on every call.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::GatewayError;

/// One table as seen in the paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    pub table_name: String,
    pub table_type: String,
    /// Human-readable total relation size (`pg_size_pretty`).
    pub table_size: String,
    pub column_count: i64,
    pub table_comment: Option<String>,
}

/// Pagination metadata accompanying a table listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: i64,
}

/// One page of the table listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablesPage {
    pub tables: Vec<TableInfo>,
    pub pagination: Pagination,
}

/// One column of a table, ordered by the store's ordinal position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    pub character_maximum_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
    pub is_nullable: bool,
    pub column_default: Option<String>,
    pub ordinal_position: i32,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub column_comment: Option<String>,
}

/// One index entry; composite indexes appear once per member column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexInfo {
    pub index_name: String,
    pub column_name: String,
    pub is_unique: bool,
    pub is_primary: bool,
}

/// Full schema of one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_name: String,
    pub table_comment: Option<String>,
    pub columns: Vec<ColumnInfo>,
    pub indexes: Vec<IndexInfo>,
    pub column_count: usize,
}

const COUNT_TABLES_SQL: &str = r#"
    SELECT COUNT(*)
    FROM information_schema.tables
    WHERE table_schema = 'public'
      AND table_type = 'BASE TABLE'
"#;

const LIST_TABLES_SQL: &str = r#"
    SELECT
        t.table_name::text AS table_name,
        t.table_type::text AS table_type,
        pg_size_pretty(pg_total_relation_size(quote_ident(t.table_name)::regclass)) AS table_size,
        (SELECT COUNT(*)
           FROM information_schema.columns c
          WHERE c.table_name = t.table_name
            AND c.table_schema = 'public') AS column_count,
        obj_description(quote_ident(t.table_name)::regclass, 'pg_class') AS table_comment
    FROM information_schema.tables t
    WHERE t.table_schema = 'public'
      AND t.table_type = 'BASE TABLE'
    ORDER BY t.table_name
    LIMIT $1 OFFSET $2
"#;

const TABLE_EXISTS_SQL: &str = r#"
    SELECT EXISTS (
        SELECT 1
        FROM information_schema.tables
        WHERE table_schema = 'public'
          AND table_name = $1
    )
"#;

const TABLE_COLUMNS_SQL: &str = r#"
    SELECT
        c.column_name::text AS column_name,
        c.data_type::text AS data_type,
        c.character_maximum_length::int4 AS character_maximum_length,
        c.numeric_precision::int4 AS numeric_precision,
        c.numeric_scale::int4 AS numeric_scale,
        c.is_nullable::text AS is_nullable,
        c.column_default::text AS column_default,
        c.ordinal_position::int4 AS ordinal_position,
        pk.column_name IS NOT NULL AS is_primary_key,
        fk.column_name IS NOT NULL AS is_foreign_key,
        col_description(quote_ident($1)::regclass, c.ordinal_position) AS column_comment
    FROM information_schema.columns c
    LEFT JOIN (
        SELECT ku.column_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage ku
            ON tc.constraint_name = ku.constraint_name
           AND tc.table_schema = ku.table_schema
        WHERE tc.constraint_type = 'PRIMARY KEY'
          AND tc.table_name = $1
          AND tc.table_schema = 'public'
    ) pk ON c.column_name = pk.column_name
    LEFT JOIN (
        SELECT ku.column_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage ku
            ON tc.constraint_name = ku.constraint_name
           AND tc.table_schema = ku.table_schema
        WHERE tc.constraint_type = 'FOREIGN KEY'
          AND tc.table_name = $1
          AND tc.table_schema = 'public'
    ) fk ON c.column_name = fk.column_name
    WHERE c.table_name = $1
      AND c.table_schema = 'public'
    ORDER BY c.ordinal_position
"#;

const TABLE_INDEXES_SQL: &str = r#"
    SELECT
        i.relname::text AS index_name,
        a.attname::text AS column_name,
        ix.indisunique AS is_unique,
        ix.indisprimary AS is_primary
    FROM pg_class t
    JOIN pg_index ix ON t.oid = ix.indrelid
    JOIN pg_class i ON i.oid = ix.indexrelid
    JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(ix.indkey)
    WHERE t.relname = $1
    ORDER BY i.relname, a.attnum
"#;

const TABLE_COMMENT_SQL: &str =
    "SELECT obj_description(quote_ident($1)::regclass, 'pg_class') AS table_comment";

/// Clamp a requested page size into `1..=max`.
pub fn clamp_page_size(requested: u32, max: u32) -> u32 {
    requested.clamp(1, max)
}

/// Ceiling division of `total_count` by `page_size`; zero tables means zero
/// pages.
pub fn total_pages(total_count: i64, page_size: u32) -> i64 {
    let page_size = i64::from(page_size);
    (total_count + page_size - 1) / page_size
}

/// Enumerates tables and columns from the caller-visible schema.
#[derive(Clone)]
pub struct SchemaInspector {
    pool: PgPool,
    max_page_size: u32,
}

impl SchemaInspector {
    pub fn new(pool: PgPool, max_page_size: u32) -> Self {
        Self {
            pool,
            max_page_size,
        }
    }

    /// List base tables of the `public` schema, ordered by name.
    ///
    /// `page` is 1-based and floored at 1; `page_size` is clamped to the
    /// configured maximum. A page past the end yields an empty list.
    pub async fn list_tables(&self, page: u32, page_size: u32) -> Result<TablesPage, GatewayError> {
        let page = page.max(1);
        let page_size = clamp_page_size(page_size, self.max_page_size);
        let offset = i64::from(page - 1) * i64::from(page_size);

        let total_count: i64 = sqlx::query_scalar(COUNT_TABLES_SQL)
            .fetch_one(&self.pool)
            .await
            .map_err(GatewayError::from_sqlx)?;

        let rows = sqlx::query(LIST_TABLES_SQL)
            .bind(i64::from(page_size))
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(GatewayError::from_sqlx)?;

        let tables = rows
            .iter()
            .map(table_info_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TablesPage {
            tables,
            pagination: Pagination {
                page,
                page_size,
                total_count,
                total_pages: total_pages(total_count, page_size),
            },
        })
    }

    /// Full schema of one table, or `TableNotFound`.
    pub async fn table_schema(&self, table_name: &str) -> Result<TableSchema, GatewayError> {
        let exists: bool = sqlx::query_scalar(TABLE_EXISTS_SQL)
            .bind(table_name)
            .fetch_one(&self.pool)
            .await
            .map_err(GatewayError::from_sqlx)?;

        if !exists {
            return Err(GatewayError::TableNotFound(table_name.to_string()));
        }

        let column_rows = sqlx::query(TABLE_COLUMNS_SQL)
            .bind(table_name)
            .fetch_all(&self.pool)
            .await
            .map_err(GatewayError::from_sqlx)?;
        let columns = column_rows
            .iter()
            .map(column_info_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let index_rows = sqlx::query(TABLE_INDEXES_SQL)
            .bind(table_name)
            .fetch_all(&self.pool)
            .await
            .map_err(GatewayError::from_sqlx)?;
        let indexes = index_rows
            .iter()
            .map(index_info_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let table_comment: Option<String> = sqlx::query_scalar(TABLE_COMMENT_SQL)
            .bind(table_name)
            .fetch_one(&self.pool)
            .await
            .map_err(GatewayError::from_sqlx)?;

        Ok(TableSchema {
            table_name: table_name.to_string(),
            table_comment,
            column_count: columns.len(),
            columns,
            indexes,
        })
    }
}

fn table_info_from_row(row: &PgRow) -> Result<TableInfo, GatewayError> {
    Ok(TableInfo {
        table_name: get(row, "table_name")?,
        table_type: get(row, "table_type")?,
        table_size: get(row, "table_size")?,
        column_count: get(row, "column_count")?,
        table_comment: get(row, "table_comment")?,
    })
}

fn column_info_from_row(row: &PgRow) -> Result<ColumnInfo, GatewayError> {
    let is_nullable: String = get(row, "is_nullable")?;
    Ok(ColumnInfo {
        column_name: get(row, "column_name")?,
        data_type: get(row, "data_type")?,
        character_maximum_length: get(row, "character_maximum_length")?,
        numeric_precision: get(row, "numeric_precision")?,
        numeric_scale: get(row, "numeric_scale")?,
        is_nullable: is_nullable.eq_ignore_ascii_case("YES"),
        column_default: get(row, "column_default")?,
        ordinal_position: get(row, "ordinal_position")?,
        is_primary_key: get(row, "is_primary_key")?,
        is_foreign_key: get(row, "is_foreign_key")?,
        column_comment: get(row, "column_comment")?,
    })
}

fn index_info_from_row(row: &PgRow) -> Result<IndexInfo, GatewayError> {
    Ok(IndexInfo {
        index_name: get(row, "index_name")?,
        column_name: get(row, "column_name")?,
        is_unique: get(row, "is_unique")?,
        is_primary: get(row, "is_primary")?,
    })
}

/// Typed column access; a mismatch here is a gateway bug, not a store fault.
fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, GatewayError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| GatewayError::Internal(format!("decode column '{column}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_clamped_to_maximum() {
        assert_eq!(clamp_page_size(10, 100), 10);
        assert_eq!(clamp_page_size(100, 100), 100);
        assert_eq!(clamp_page_size(101, 100), 100);
        assert_eq!(clamp_page_size(100_000, 100), 100);
    }

    #[test]
    fn page_size_zero_is_floored_to_one() {
        assert_eq!(clamp_page_size(0, 100), 1);
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(3, 100), 1);
    }

    #[test]
    fn listing_sql_targets_public_schema_only() {
        assert!(LIST_TABLES_SQL.contains("table_schema = 'public'"));
        assert!(COUNT_TABLES_SQL.contains("table_schema = 'public'"));
        assert!(LIST_TABLES_SQL.contains("ORDER BY t.table_name"));
    }

    #[test]
    fn schema_sql_is_parameterized_not_interpolated() {
        for sql in [TABLE_EXISTS_SQL, TABLE_COLUMNS_SQL, TABLE_INDEXES_SQL, TABLE_COMMENT_SQL] {
            assert!(sql.contains("$1"));
        }
        assert!(TABLE_COLUMNS_SQL.contains("ORDER BY c.ordinal_position"));
    }
}
