//! 合集-游戏关联实体

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collectiongame")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "collectionid")]
    pub collection_id: i32,
    #[sea_orm(primary_key, auto_increment = false, column_name = "gameid")]
    pub game_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::collection::Entity",
        from = "Column::CollectionId",
        to = "super::collection::Column::Id",
        on_delete = "Cascade"
    )]
    Collection,
    #[sea_orm(
        belongs_to = "super::videogame::Entity",
        from = "Column::GameId",
        to = "super::videogame::Column::Id",
        on_delete = "Cascade"
    )]
    Videogame,
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collection.def()
    }
}

impl Related<super::videogame::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videogame.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
