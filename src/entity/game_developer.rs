//! 游戏-开发商关联

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gamedeveloper")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "gameid")]
    pub game_id: i32,
    #[sea_orm(primary_key, auto_increment = false, column_name = "companyid")]
    pub company_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
