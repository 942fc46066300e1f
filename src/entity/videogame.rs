//! 游戏目录实体
//!
//! 平台、开发商、发行商、类型均通过多对多关联表连接。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "videogame")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "gameid")]
    pub id: i32,
    pub title: String,
    pub esrb_rating: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::collection_game::Entity")]
    CollectionGame,
    #[sea_orm(has_many = "super::game_platform::Entity")]
    GamePlatform,
}

impl Related<super::collection_game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionGame.def()
    }
}

impl Related<super::game_platform::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GamePlatform.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
