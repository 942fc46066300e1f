use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "platform")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "platformid")]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_platform::Entity")]
    UserPlatform,
}

impl Related<super::user_platform::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserPlatform.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
