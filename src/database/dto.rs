//! 数据传输对象 (DTO)
//!
//! 聚合查询的结果行以及服务层的输入结构。

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::FromQueryResult;
use serde::Serialize;

// ==================== 输入 ====================

/// 注册表单
#[derive(Clone, Debug, Default)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

impl NewUser {
    /// 所有字段均需填写
    pub fn is_complete(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.username,
            &self.password,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

// ==================== 合集 ====================

/// 合集列表行：游戏数量与该用户在这些游戏上的总游玩时长
#[derive(Clone, Debug, Serialize, FromQueryResult, PartialEq, Eq)]
pub struct CollectionSummary {
    pub collection_id: i32,
    pub name: String,
    pub game_count: i64,
    pub total_minutes: i64,
}

#[derive(Clone, Debug, Serialize, FromQueryResult, PartialEq, Eq)]
pub struct GameBrief {
    pub game_id: i32,
    pub title: String,
    pub esrb_rating: Option<String>,
}

/// 添加游戏到合集的结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlatformCheck {
    /// 用户拥有该游戏的至少一个平台
    Owned,
    /// 用户不拥有任何平台，需要用户确认
    NotOwned,
}

// ==================== 搜索 ====================

#[derive(Clone, Debug, Serialize, FromQueryResult, PartialEq)]
pub struct SearchRow {
    pub game_id: i32,
    pub title: String,
    pub esrb_rating: Option<String>,
    pub platforms: Option<String>,
    pub developers: Option<String>,
    pub publishers: Option<String>,
    pub playtime: i64,
    pub my_rating: Option<i32>,
    pub release_year: Option<i32>,
    pub min_price: Option<f64>,
}

// ==================== 游玩记录 ====================

#[derive(Clone, Debug, Serialize, FromQueryResult, PartialEq, Eq)]
pub struct PlayRecord {
    pub game_id: i32,
    pub title: String,
    pub played_at: NaiveDateTime,
    pub duration: i32,
}

// ==================== 社交 ====================

#[derive(Clone, Debug, Serialize, FromQueryResult, PartialEq, Eq)]
pub struct UserMatch {
    pub user_id: i32,
    pub username: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, FromQueryResult, PartialEq, Eq)]
pub struct FollowEntry {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub follow_date: NaiveDateTime,
}

/// 关注对象的游玩动态
#[derive(Clone, Debug, Serialize, FromQueryResult, PartialEq, Eq)]
pub struct ActivityEntry {
    pub username: String,
    pub game_id: i32,
    pub title: String,
    pub played_at: NaiveDateTime,
    pub duration: i32,
}

// ==================== 个人资料 ====================

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ProfileSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub collections: u64,
    pub followers: u64,
    pub following: u64,
}

/// 用户库中单个游戏的评分与时长
#[derive(Clone, Debug, Serialize, FromQueryResult, PartialEq, Eq)]
pub struct LibraryGameStat {
    pub game_id: i32,
    pub title: String,
    pub rating: Option<i32>,
    pub playtime: i64,
}

// ==================== 热门与推荐 ====================

#[derive(Clone, Debug, Serialize, FromQueryResult, PartialEq, Eq)]
pub struct PopularGame {
    pub game_id: i32,
    pub title: String,
    pub total_minutes: i64,
    pub players: i64,
}

#[derive(Clone, Debug, Serialize, FromQueryResult, PartialEq, Eq)]
pub struct NewRelease {
    pub game_id: i32,
    pub title: String,
    pub release_date: NaiveDate,
    pub total_minutes: i64,
}

/// 用户偏好统计（类型或开发商）的出现次数
#[derive(Clone, Debug, FromQueryResult, PartialEq, Eq)]
pub struct TasteCount {
    pub id: i32,
    pub name: String,
    pub occurrences: i64,
}

/// 推荐候选：是否命中偏好类型/开发商以及平均评分
#[derive(Clone, Debug, FromQueryResult, PartialEq)]
pub struct CandidateGame {
    pub game_id: i32,
    pub title: String,
    pub genre_hit: i64,
    pub developer_hit: i64,
    pub avg_rating: Option<f64>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Recommendation {
    pub game_id: i32,
    pub title: String,
    pub score: i32,
    pub avg_rating: Option<f64>,
    /// 来自高评分兜底列表
    pub fallback: bool,
}

/// 推荐结果以及所依据的偏好
#[derive(Clone, Debug, Serialize, PartialEq, Default)]
pub struct RecommendationReport {
    pub top_genres: Vec<String>,
    pub top_developers: Vec<String>,
    pub items: Vec<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_requires_every_field() {
        let mut user = NewUser {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            username: "ada".into(),
            password: "pw".into(),
        };
        assert!(user.is_complete());
        user.email = "   ".into();
        assert!(!user.is_complete());
    }
}
