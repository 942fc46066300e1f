use chrono::NaiveDateTime;
use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::database::dto::NewUser;
use crate::entity::prelude::*;
use crate::entity::users;

/// 用户数据仓库
pub struct UsersRepository;

impl UsersRepository {
    /// 根据用户名查询
    pub async fn find_by_username<C: ConnectionTrait>(
        db: &C,
        username: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        Users::find()
            .filter(users::Column::Username.eq(username))
            .one(db)
            .await
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: i32,
    ) -> Result<Option<users::Model>, DbErr> {
        Users::find_by_id(id).one(db).await
    }

    /// 创建用户，`password_hash` 为已经加盐哈希后的值
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        input: &NewUser,
        password_hash: String,
        now: NaiveDateTime,
    ) -> Result<users::Model, DbErr> {
        let user = users::ActiveModel {
            id: NotSet,
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            email: Set(input.email.trim().to_string()),
            username: Set(input.username.trim().to_string()),
            password: Set(password_hash),
            creation_date: Set(now),
            last_access_date: Set(None),
        };

        user.insert(db).await
    }

    /// 更新最后访问时间
    pub async fn touch_last_access<C: ConnectionTrait>(
        db: &C,
        id: i32,
        now: NaiveDateTime,
    ) -> Result<(), DbErr> {
        Users::update_many()
            .col_expr(users::Column::LastAccessDate, Expr::value(now))
            .filter(users::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(())
    }
}
