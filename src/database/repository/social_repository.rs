use chrono::NaiveDateTime;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::*;

use crate::database::dto::{ActivityEntry, FollowEntry, UserMatch};
use crate::database::sql::{SqlBuilder, contains_pattern};
use crate::entity::prelude::*;
use crate::entity::{follows, users};

/// 关注关系仓库
pub struct SocialRepository;

/// 关注列表的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowDirection {
    /// 我关注的人
    Following,
    /// 关注我的人
    Followers,
}

impl SocialRepository {
    /// 按邮箱子串搜索用户（不区分大小写，排除自己）
    pub async fn search_by_email<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        fragment: &str,
    ) -> Result<Vec<UserMatch>, DbErr> {
        let pattern = contains_pattern(&fragment.to_lowercase());

        Users::find()
            .select_only()
            .column_as(users::Column::Id, "user_id")
            .column(users::Column::Username)
            .column(users::Column::Email)
            .filter(
                Expr::expr(Func::lower(Expr::col(users::Column::Email)))
                    .like(LikeExpr::new(pattern).escape('\\')),
            )
            .filter(users::Column::Id.ne(user_id))
            .order_by_asc(users::Column::Username)
            .into_model::<UserMatch>()
            .all(db)
            .await
    }

    pub async fn follow<C: ConnectionTrait>(
        db: &C,
        follower_id: i32,
        followed_id: i32,
        now: NaiveDateTime,
    ) -> Result<(), DbErr> {
        let edge = follows::ActiveModel {
            follower_id: Set(follower_id),
            followed_id: Set(followed_id),
            follow_date: Set(now),
        };
        Follows::insert(edge).exec_without_returning(db).await?;
        Ok(())
    }

    /// 取消关注，返回删除的行数
    pub async fn unfollow<C: ConnectionTrait>(
        db: &C,
        follower_id: i32,
        followed_id: i32,
    ) -> Result<u64, DbErr> {
        let result = Follows::delete_by_id((follower_id, followed_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn is_following<C: ConnectionTrait>(
        db: &C,
        follower_id: i32,
        followed_id: i32,
    ) -> Result<bool, DbErr> {
        Ok(Follows::find_by_id((follower_id, followed_id))
            .one(db)
            .await?
            .is_some())
    }

    /// 关注/粉丝列表（按用户名排序）
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        direction: FollowDirection,
    ) -> Result<Vec<FollowEntry>, DbErr> {
        // (连接对方所用的列, 过滤自己所用的列)
        let (other, me) = match direction {
            FollowDirection::Following => ("f.followedid", "f.followerid"),
            FollowDirection::Followers => ("f.followerid", "f.followedid"),
        };

        let mut b = SqlBuilder::new(db.get_database_backend());
        b.push(&format!(
            "SELECT u.userid AS user_id, u.username AS username, u.email AS email, \
             f.followdate AS follow_date \
             FROM follows f JOIN users u ON {other} = u.userid \
             WHERE {me} = "
        ))
        .bind(user_id)
        .push(" ORDER BY u.username ASC");

        FollowEntry::find_by_statement(b.build()).all(db).await
    }

    pub async fn count<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        direction: FollowDirection,
    ) -> Result<u64, DbErr> {
        let column = match direction {
            FollowDirection::Following => follows::Column::FollowerId,
            FollowDirection::Followers => follows::Column::FollowedId,
        };
        Follows::find().filter(column.eq(user_id)).count(db).await
    }

    /// 关注对象最近的游玩记录
    pub async fn followed_activity<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<ActivityEntry>, DbErr> {
        let mut b = SqlBuilder::new(db.get_database_backend());
        b.push(
            "SELECT u.username AS username, v.gameid AS game_id, v.title AS title, \
             pl.playdatetime AS played_at, pl.duration AS duration \
             FROM plays pl \
             JOIN follows f ON f.followedid = pl.userid \
             JOIN users u ON u.userid = pl.userid \
             JOIN videogame v ON v.gameid = pl.gameid \
             WHERE f.followerid = ",
        )
        .bind(user_id)
        .push(&format!(
            " ORDER BY pl.playdatetime DESC, u.username ASC LIMIT {limit}"
        ));

        ActivityEntry::find_by_statement(b.build()).all(db).await
    }
}
