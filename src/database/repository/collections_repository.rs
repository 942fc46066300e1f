use sea_orm::*;

use crate::database::dto::{CollectionSummary, GameBrief};
use crate::database::sql::SqlBuilder;
use crate::entity::prelude::*;
use crate::entity::{collection, collection_game, videogame};

/// 合集数据仓库
pub struct CollectionsRepository;

impl CollectionsRepository {
    // ==================== 合集 CRUD 操作 ====================

    /// 创建合集
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        name: &str,
    ) -> Result<collection::Model, DbErr> {
        let model = collection::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            name: Set(name.to_string()),
        };

        model.insert(db).await
    }

    /// 查询属于该用户的合集
    pub async fn find_owned<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        collection_id: i32,
    ) -> Result<Option<collection::Model>, DbErr> {
        Collection::find_by_id(collection_id)
            .filter(collection::Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    pub async fn count_by_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<u64, DbErr> {
        Collection::find()
            .filter(collection::Column::UserId.eq(user_id))
            .count(db)
            .await
    }

    /// 合集列表：游戏数量以及用户在这些游戏上的总时长
    pub async fn list_summaries<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
    ) -> Result<Vec<CollectionSummary>, DbErr> {
        let mut b = SqlBuilder::new(db.get_database_backend());
        let game_count = b.as_bigint("COUNT(DISTINCT cg.gameid)");
        let total = b.as_bigint("COALESCE(SUM(p.duration), 0)");
        b.push("SELECT c.collectionid AS collection_id, c.name AS name, ")
            .push(&game_count)
            .push(" AS game_count, ")
            .push(&total)
            .push(
                " AS total_minutes \
                 FROM collection c \
                 LEFT JOIN collectiongame cg ON c.collectionid = cg.collectionid \
                 LEFT JOIN plays p ON cg.gameid = p.gameid AND c.userid = p.userid \
                 WHERE c.userid = ",
            )
            .bind(user_id)
            .push(" GROUP BY c.collectionid, c.name ORDER BY c.name ASC");

        CollectionSummary::find_by_statement(b.build())
            .all(db)
            .await
    }

    /// 重命名合集
    pub async fn rename<C: ConnectionTrait>(
        db: &C,
        existing: collection::Model,
        name: &str,
    ) -> Result<collection::Model, DbErr> {
        let mut active: collection::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.update(db).await
    }

    /// 删除合集：先删除游戏关联，再删除合集本身
    pub async fn delete<C: ConnectionTrait>(db: &C, collection_id: i32) -> Result<(), DbErr> {
        CollectionGame::delete_many()
            .filter(collection_game::Column::CollectionId.eq(collection_id))
            .exec(db)
            .await?;
        Collection::delete_by_id(collection_id).exec(db).await?;
        Ok(())
    }

    // ==================== 游戏-合集关联操作 ====================

    /// 将游戏添加到合集
    pub async fn add_game<C: ConnectionTrait>(
        db: &C,
        collection_id: i32,
        game_id: i32,
    ) -> Result<(), DbErr> {
        let link = collection_game::ActiveModel {
            collection_id: Set(collection_id),
            game_id: Set(game_id),
        };

        CollectionGame::insert(link).exec_without_returning(db).await?;
        Ok(())
    }

    /// 从合集中移除游戏，返回删除的行数
    pub async fn remove_game<C: ConnectionTrait>(
        db: &C,
        collection_id: i32,
        game_id: i32,
    ) -> Result<u64, DbErr> {
        let result = CollectionGame::delete_many()
            .filter(
                collection_game::Column::CollectionId
                    .eq(collection_id)
                    .and(collection_game::Column::GameId.eq(game_id)),
            )
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }

    /// 合集中的游戏（按标题排序）
    pub async fn games_in_collection<C: ConnectionTrait>(
        db: &C,
        collection_id: i32,
    ) -> Result<Vec<GameBrief>, DbErr> {
        Videogame::find()
            .select_only()
            .column_as(videogame::Column::Id, "game_id")
            .column(videogame::Column::Title)
            .column(videogame::Column::EsrbRating)
            .inner_join(CollectionGame)
            .filter(collection_game::Column::CollectionId.eq(collection_id))
            .order_by_asc(videogame::Column::Title)
            .into_model::<GameBrief>()
            .all(db)
            .await
    }

    /// 合集中的游戏 ID
    pub async fn game_ids<C: ConnectionTrait>(
        db: &C,
        collection_id: i32,
    ) -> Result<Vec<i32>, DbErr> {
        let links = CollectionGame::find()
            .filter(collection_game::Column::CollectionId.eq(collection_id))
            .all(db)
            .await?;

        Ok(links.into_iter().map(|link| link.game_id).collect())
    }

    /// 检查游戏是否在合集中
    pub async fn contains_game<C: ConnectionTrait>(
        db: &C,
        collection_id: i32,
        game_id: i32,
    ) -> Result<bool, DbErr> {
        let count = CollectionGame::find()
            .filter(
                collection_game::Column::CollectionId
                    .eq(collection_id)
                    .and(collection_game::Column::GameId.eq(game_id)),
            )
            .count(db)
            .await?;

        Ok(count > 0)
    }
}
