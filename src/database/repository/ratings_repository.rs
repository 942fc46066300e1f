use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::entity::prelude::*;
use crate::entity::purchases;

/// 评分仓库：每个 (用户, 游戏) 至多一条记录
pub struct RatingsRepository;

impl RatingsRepository {
    /// 插入或覆盖评分
    pub async fn upsert<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        game_id: i32,
        stars: i32,
    ) -> Result<(), DbErr> {
        let rating = purchases::ActiveModel {
            user_id: Set(user_id),
            game_id: Set(game_id),
            star_rating: Set(Some(stars)),
        };

        Purchases::insert(rating)
            .on_conflict(
                OnConflict::columns([purchases::Column::UserId, purchases::Column::GameId])
                    .update_column(purchases::Column::StarRating)
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        Ok(())
    }
}
