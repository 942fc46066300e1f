//! 合集实体
//!
//! 合集归属于单个用户，同一用户下名称唯一（由数据库唯一约束保证）。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collection")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "collectionid")]
    pub id: i32,
    #[sea_orm(column_name = "userid")]
    pub user_id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::collection_game::Entity")]
    CollectionGame,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::collection_game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionGame.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
