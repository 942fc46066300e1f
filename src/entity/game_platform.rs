//! 游戏-平台关联
//!
//! 同一游戏在不同平台上有各自的发行日期与价格。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gameplatform")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "gameid")]
    pub game_id: i32,
    #[sea_orm(primary_key, auto_increment = false, column_name = "platformid")]
    pub platform_id: i32,
    #[sea_orm(column_name = "releasedate")]
    pub release_date: Option<Date>,
    #[sea_orm(column_type = "Double", nullable)]
    pub price: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::videogame::Entity",
        from = "Column::GameId",
        to = "super::videogame::Column::Id",
        on_delete = "Cascade"
    )]
    Videogame,
    #[sea_orm(
        belongs_to = "super::platform::Entity",
        from = "Column::PlatformId",
        to = "super::platform::Column::Id",
        on_delete = "Cascade"
    )]
    Platform,
}

impl Related<super::videogame::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videogame.def()
    }
}

impl Related<super::platform::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Platform.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
