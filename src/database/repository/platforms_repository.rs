use sea_orm::*;

use crate::entity::prelude::*;
use crate::entity::{platform, user_platform};

/// 平台与用户拥有平台的数据仓库
pub struct PlatformsRepository;

impl PlatformsRepository {
    /// 所有平台（按名称排序）
    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<platform::Model>, DbErr> {
        Platform::find()
            .order_by_asc(platform::Column::Name)
            .all(db)
            .await
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: i32,
    ) -> Result<Option<platform::Model>, DbErr> {
        Platform::find_by_id(id).one(db).await
    }

    /// 用户拥有的平台
    pub async fn owned_by_user<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
    ) -> Result<Vec<platform::Model>, DbErr> {
        Platform::find()
            .inner_join(UserPlatform)
            .filter(user_platform::Column::UserId.eq(user_id))
            .order_by_asc(platform::Column::Name)
            .all(db)
            .await
    }

    pub async fn owned_ids<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<i32>, DbErr> {
        UserPlatform::find()
            .select_only()
            .column(user_platform::Column::PlatformId)
            .filter(user_platform::Column::UserId.eq(user_id))
            .into_tuple::<i32>()
            .all(db)
            .await
    }

    pub async fn add_owned<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        platform_id: i32,
    ) -> Result<(), DbErr> {
        let link = user_platform::ActiveModel {
            user_id: Set(user_id),
            platform_id: Set(platform_id),
        };
        UserPlatform::insert(link).exec_without_returning(db).await?;
        Ok(())
    }

    /// 移除用户拥有的平台，返回删除的行数
    pub async fn remove_owned<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        platform_id: i32,
    ) -> Result<u64, DbErr> {
        let result = UserPlatform::delete_many()
            .filter(user_platform::Column::UserId.eq(user_id))
            .filter(user_platform::Column::PlatformId.eq(platform_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
