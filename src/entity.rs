//! 数据实体模块
//!
//! 包含所有 SeaORM 实体定义。表结构由外部数据库维护，
//! 列名沿用数据库中的全小写命名（通过 `column_name` 映射）。

pub mod prelude;

// === 游戏目录 ===
pub mod company;
pub mod game_developer;
pub mod game_genre;
pub mod game_platform;
pub mod game_publisher;
pub mod genre;
pub mod platform;
pub mod videogame;

// === 用户与活动 ===
pub mod collection;
pub mod collection_game;
pub mod follows;
pub mod plays;
pub mod purchases;
pub mod user_platform;
pub mod users;
