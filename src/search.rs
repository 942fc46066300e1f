//! 游戏搜索
//!
//! 表单输入解析为 [`SearchFilters`]；查询结果缓存在会话中，
//! 之后的排序完全在内存中完成，不再访问数据库。

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::database::dto::SearchRow;

pub const INVALID_YEAR_WARNING: &str = "Invalid Release Year. Must be a number. Year filter ignored.";
pub const INVALID_PRICE_WARNING: &str = "Invalid Price. Must be a number. Price filter ignored.";

/// 七个可选过滤条件，`None` 表示不参与查询
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub title: Option<String>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub genre: Option<String>,
    pub platform: Option<String>,
    pub year: Option<i32>,
    pub max_price: Option<f64>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 搜索表单的原始文本
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    pub title: String,
    pub developer: String,
    pub publisher: String,
    pub genre: String,
    pub platform: String,
    pub year: String,
    pub max_price: String,
}

/// 解析结果：过滤条件以及被忽略字段的警告
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSearch {
    pub filters: SearchFilters,
    pub warnings: Vec<&'static str>,
}

fn text_filter(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl SearchInput {
    /// 解析表单；年份或价格无法解析时忽略该条件并给出警告
    pub fn parse(&self) -> ParsedSearch {
        let mut warnings = Vec::new();

        let year = match self.year.trim() {
            "" => None,
            raw => match raw.parse::<i32>() {
                Ok(y) => Some(y),
                Err(_) => {
                    warnings.push(INVALID_YEAR_WARNING);
                    None
                }
            },
        };

        let max_price = match self.max_price.trim() {
            "" => None,
            raw => match raw.parse::<f64>() {
                Ok(p) if p.is_finite() => Some(p),
                _ => {
                    warnings.push(INVALID_PRICE_WARNING);
                    None
                }
            },
        };

        ParsedSearch {
            filters: SearchFilters {
                title: text_filter(&self.title),
                developer: text_filter(&self.developer),
                publisher: text_filter(&self.publisher),
                genre: text_filter(&self.genre),
                platform: text_filter(&self.platform),
                year,
                max_price,
            },
            warnings,
        }
    }
}

// ==================== 排序 ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Title,
    Year,
    Price,
    Platforms,
    Developers,
    Publishers,
    Playtime,
    AgeRating,
    Rating,
}

impl SortColumn {
    pub const ALL: [SortColumn; 9] = [
        SortColumn::Title,
        SortColumn::Year,
        SortColumn::Price,
        SortColumn::Platforms,
        SortColumn::Developers,
        SortColumn::Publishers,
        SortColumn::Playtime,
        SortColumn::AgeRating,
        SortColumn::Rating,
    ];

    fn key(self, row: &SearchRow) -> SortKey {
        let text = |v: &Option<String>| SortKey::Text(v.as_deref().unwrap_or("").to_lowercase());
        match self {
            SortColumn::Title => SortKey::Text(row.title.to_lowercase()),
            SortColumn::Year => SortKey::Number(row.release_year.map_or(0.0, f64::from)),
            SortColumn::Price => SortKey::Number(row.min_price.unwrap_or(-1.0)),
            SortColumn::Platforms => text(&row.platforms),
            SortColumn::Developers => text(&row.developers),
            SortColumn::Publishers => text(&row.publishers),
            SortColumn::Playtime => SortKey::Number(row.playtime as f64),
            SortColumn::AgeRating => text(&row.esrb_rating),
            SortColumn::Rating => SortKey::Number(row.my_rating.map_or(-1.0, f64::from)),
        }
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "title" => Ok(SortColumn::Title),
            "year" | "releaseyear" => Ok(SortColumn::Year),
            "price" => Ok(SortColumn::Price),
            "platform" | "platforms" => Ok(SortColumn::Platforms),
            "developer" | "developers" => Ok(SortColumn::Developers),
            "publisher" | "publishers" => Ok(SortColumn::Publishers),
            "playtime" | "myplaytime" => Ok(SortColumn::Playtime),
            "age" | "agerating" | "esrb" => Ok(SortColumn::AgeRating),
            "rating" | "myrating" => Ok(SortColumn::Rating),
            _ => Err(format!(
                "Unknown column '{}'. Columns: {}",
                s.trim(),
                SortColumn::ALL.map(|c| c.to_string()).join(", ")
            )),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortColumn::Title => "title",
            SortColumn::Year => "year",
            SortColumn::Price => "price",
            SortColumn::Platforms => "platforms",
            SortColumn::Developers => "developers",
            SortColumn::Publishers => "publishers",
            SortColumn::Playtime => "playtime",
            SortColumn::AgeRating => "age-rating",
            SortColumn::Rating => "rating",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Text(String),
    Number(f64),
}

impl SortKey {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            // 同一列的键类型总是一致
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        }
    }
}

/// 缓存的搜索结果
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    rows: Vec<SearchRow>,
    sorted_by: Option<(SortColumn, SortDirection)>,
}

impl SearchResults {
    pub fn new(rows: Vec<SearchRow>) -> Self {
        Self {
            rows,
            sorted_by: None,
        }
    }

    pub fn rows(&self) -> &[SearchRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 按展示序号（从 1 开始）取行
    pub fn row(&self, number: usize) -> Option<&SearchRow> {
        number.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    pub fn sorted_by(&self) -> Option<(SortColumn, SortDirection)> {
        self.sorted_by
    }

    /// 按列排序；连续对同一列排序时切换升降序
    pub fn sort_by(&mut self, column: SortColumn) -> SortDirection {
        let direction = match self.sorted_by {
            Some((current, SortDirection::Ascending)) if current == column => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };

        let mut keyed: Vec<(SortKey, SearchRow)> = self
            .rows
            .drain(..)
            .map(|row| (column.key(&row), row))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| match direction {
            SortDirection::Ascending => a.compare(b),
            SortDirection::Descending => b.compare(a),
        });
        self.rows = keyed.into_iter().map(|(_, row)| row).collect();

        self.sorted_by = Some((column, direction));
        direction
    }

    /// 更新某个游戏的缓存值（评分或游玩后无需重新查询）
    pub fn update_game(&mut self, game_id: i32, update: impl Fn(&mut SearchRow)) {
        for row in self.rows.iter_mut().filter(|r| r.game_id == game_id) {
            update(row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, title: &str) -> SearchRow {
        SearchRow {
            game_id: id,
            title: title.to_string(),
            esrb_rating: None,
            platforms: None,
            developers: None,
            publishers: None,
            playtime: 0,
            my_rating: None,
            release_year: None,
            min_price: None,
        }
    }

    fn ids(results: &SearchResults) -> Vec<i32> {
        results.rows().iter().map(|r| r.game_id).collect()
    }

    #[test]
    fn blank_fields_produce_no_filters() {
        let parsed = SearchInput {
            title: "   ".into(),
            ..Default::default()
        }
        .parse();
        assert!(parsed.filters.is_empty());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn invalid_numbers_are_ignored_with_warnings() {
        let parsed = SearchInput {
            title: "Zelda".into(),
            year: "nineteen".into(),
            max_price: "cheap".into(),
            ..Default::default()
        }
        .parse();
        assert_eq!(parsed.filters.title.as_deref(), Some("Zelda"));
        assert_eq!(parsed.filters.year, None);
        assert_eq!(parsed.filters.max_price, None);
        assert_eq!(parsed.warnings, vec![INVALID_YEAR_WARNING, INVALID_PRICE_WARNING]);
    }

    #[test]
    fn numeric_fields_parse() {
        let parsed = SearchInput {
            year: " 2017 ".into(),
            max_price: "19.99".into(),
            ..Default::default()
        }
        .parse();
        assert_eq!(parsed.filters.year, Some(2017));
        assert_eq!(parsed.filters.max_price, Some(19.99));
    }

    #[test]
    fn title_sort_is_case_insensitive_and_toggles() {
        let mut results = SearchResults::new(vec![row(1, "beta"), row(2, "Alpha"), row(3, "gamma")]);
        assert_eq!(results.sort_by(SortColumn::Title), SortDirection::Ascending);
        assert_eq!(ids(&results), vec![2, 1, 3]);
        assert_eq!(results.sort_by(SortColumn::Title), SortDirection::Descending);
        assert_eq!(ids(&results), vec![3, 1, 2]);
        assert_eq!(results.sort_by(SortColumn::Title), SortDirection::Ascending);
    }

    #[test]
    fn switching_column_restarts_ascending() {
        let mut results = SearchResults::new(vec![row(1, "a"), row(2, "b")]);
        results.sort_by(SortColumn::Title);
        results.sort_by(SortColumn::Title);
        assert_eq!(results.sort_by(SortColumn::Playtime), SortDirection::Ascending);
    }

    #[test]
    fn missing_values_use_sentinels() {
        let mut priced = row(1, "priced");
        priced.min_price = Some(0.0);
        priced.my_rating = Some(1);
        priced.release_year = Some(1990);
        let unpriced = row(2, "unpriced");

        let mut results = SearchResults::new(vec![priced, unpriced]);
        results.sort_by(SortColumn::Price);
        assert_eq!(ids(&results), vec![2, 1]);

        results.sort_by(SortColumn::Rating);
        assert_eq!(ids(&results), vec![2, 1]);

        results.sort_by(SortColumn::Year);
        assert_eq!(ids(&results), vec![2, 1]);
    }

    #[test]
    fn sorting_is_stable_for_equal_keys() {
        let mut results = SearchResults::new(vec![row(1, "x"), row(2, "y"), row(3, "z")]);
        results.sort_by(SortColumn::Playtime);
        assert_eq!(ids(&results), vec![1, 2, 3]);
        results.sort_by(SortColumn::Playtime);
        assert_eq!(ids(&results), vec![1, 2, 3]);
    }

    #[test]
    fn column_names_parse_with_aliases() {
        assert_eq!("My Rating".parse::<SortColumn>(), Ok(SortColumn::Rating));
        assert_eq!("age-rating".parse::<SortColumn>(), Ok(SortColumn::AgeRating));
        assert_eq!("PLATFORM".parse::<SortColumn>(), Ok(SortColumn::Platforms));
        assert!("colour".parse::<SortColumn>().is_err());
    }

    #[test]
    fn rows_are_addressed_from_one() {
        let results = SearchResults::new(vec![row(10, "a"), row(20, "b")]);
        assert_eq!(results.row(1).map(|r| r.game_id), Some(10));
        assert!(results.row(0).is_none());
        assert!(results.row(3).is_none());
    }
}
