//! 参数化 SQL 构建
//!
//! 聚合查询需要在 Postgres 与 SQLite 上都能执行，这里集中处理
//! 占位符、字符串聚合、年份提取和不区分大小写匹配的方言差异。

use sea_orm::{DatabaseBackend, Statement, Value};

/// 逐段拼接 SQL，并按后端生成占位符
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    backend: DatabaseBackend,
    sql: String,
    values: Vec<Value>,
}

impl SqlBuilder {
    pub fn new(backend: DatabaseBackend) -> Self {
        Self {
            backend,
            sql: String::new(),
            values: Vec::new(),
        }
    }

    pub fn backend(&self) -> DatabaseBackend {
        self.backend
    }

    /// 追加原样 SQL 文本
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// 追加一个占位符并记录其参数
    pub fn bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.values.push(value.into());
        match self.backend {
            DatabaseBackend::Postgres => {
                self.sql.push('$');
                self.sql.push_str(&self.values.len().to_string());
            }
            _ => self.sql.push('?'),
        }
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn build(self) -> Statement {
        log::trace!("SQL: {}", self.sql);
        Statement::from_sql_and_values(self.backend, self.sql, self.values)
    }

    // ==================== 方言片段 ====================

    /// 按名称排序、以 `, ` 连接的字符串聚合
    pub fn string_agg(&self, expr: &str) -> String {
        match self.backend {
            DatabaseBackend::Postgres => {
                format!("STRING_AGG({expr}, ', ' ORDER BY {expr})")
            }
            DatabaseBackend::MySql => {
                format!("GROUP_CONCAT({expr} ORDER BY {expr} SEPARATOR ', ')")
            }
            DatabaseBackend::Sqlite => {
                format!("GROUP_CONCAT({expr}, ', ' ORDER BY {expr})")
            }
        }
    }

    /// 从日期列中提取年份（整数）
    pub fn year_of(&self, expr: &str) -> String {
        match self.backend {
            DatabaseBackend::Postgres => format!("CAST(EXTRACT(YEAR FROM {expr}) AS INTEGER)"),
            DatabaseBackend::MySql => format!("YEAR({expr})"),
            DatabaseBackend::Sqlite => format!("CAST(strftime('%Y', {expr}) AS INTEGER)"),
        }
    }

    /// 不区分大小写的 LIKE 运算符（SQLite 的 LIKE 本身对 ASCII 不区分大小写）
    pub fn ilike(&self) -> &'static str {
        match self.backend {
            DatabaseBackend::Postgres => "ILIKE",
            _ => "LIKE",
        }
    }

    /// 追加 `<expr> ILIKE '%input%'` 子串匹配谓词
    pub fn push_contains(&mut self, expr: &str, input: &str) -> &mut Self {
        let op = self.ilike();
        self.push(expr).push(" ").push(op).push(" ");
        self.bind(contains_pattern(input));
        self.push(" ESCAPE '\\'")
    }

    /// 转换为双精度浮点，保证两种后端解码类型一致
    pub fn as_double(&self, expr: &str) -> String {
        match self.backend {
            DatabaseBackend::MySql => format!("CAST({expr} AS DOUBLE)"),
            _ => format!("CAST({expr} AS DOUBLE PRECISION)"),
        }
    }

    pub fn as_bigint(&self, expr: &str) -> String {
        match self.backend {
            DatabaseBackend::MySql => format!("CAST({expr} AS SIGNED)"),
            _ => format!("CAST({expr} AS BIGINT)"),
        }
    }
}

/// 转义 LIKE 通配符并包装为子串匹配模式
pub fn contains_pattern(input: &str) -> String {
    let mut pattern = String::with_capacity(input.len() + 2);
    pattern.push('%');
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
