//! 用户实体
//!
//! 密码列保存 `salt:hash` 格式的十六进制字符串，不保存明文。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "userid")]
    pub id: i32,
    #[sea_orm(column_name = "firstname")]
    pub first_name: String,
    #[sea_orm(column_name = "lastname")]
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[sea_orm(column_name = "creationdate")]
    pub creation_date: DateTime,
    #[sea_orm(column_name = "lastaccessdate")]
    pub last_access_date: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::collection::Entity")]
    Collection,
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collection.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
