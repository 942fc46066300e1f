use chrono::NaiveDateTime;
use sea_orm::*;

use crate::database::dto::PlayRecord;
use crate::entity::prelude::*;
use crate::entity::{plays, videogame};

/// 游玩记录仓库（只追加）
pub struct PlaysRepository;

impl PlaysRepository {
    /// 记录一次游玩
    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        game_id: i32,
        played_at: NaiveDateTime,
        minutes: i32,
    ) -> Result<(), DbErr> {
        let play = plays::ActiveModel {
            user_id: Set(user_id),
            game_id: Set(game_id),
            play_date_time: Set(played_at),
            duration: Set(minutes),
        };
        Plays::insert(play).exec_without_returning(db).await?;
        Ok(())
    }

    /// 用户最近的游玩记录
    pub async fn recent_for_user<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<PlayRecord>, DbErr> {
        Plays::find()
            .select_only()
            .column_as(plays::Column::GameId, "game_id")
            .column_as(videogame::Column::Title, "title")
            .column_as(plays::Column::PlayDateTime, "played_at")
            .column_as(plays::Column::Duration, "duration")
            .inner_join(Videogame)
            .filter(plays::Column::UserId.eq(user_id))
            .order_by_desc(plays::Column::PlayDateTime)
            .limit(limit)
            .into_model::<PlayRecord>()
            .all(db)
            .await
    }
}
