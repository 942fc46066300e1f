use sea_orm::*;

use crate::database::dto::LibraryGameStat;
use crate::database::repository::push_library_game_ids;
use crate::database::sql::SqlBuilder;

/// 个人统计仓库
pub struct StatsRepository;

impl StatsRepository {
    /// 用户库中每个游戏的评分和总游玩时长
    pub async fn library_stats<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
    ) -> Result<Vec<LibraryGameStat>, DbErr> {
        let mut b = SqlBuilder::new(db.get_database_backend());
        let playtime = b.as_bigint("COALESCE(SUM(pl.duration), 0)");

        b.push(
            "SELECT v.gameid AS game_id, v.title AS title, \
             (SELECT pu.starrating FROM purchases pu WHERE pu.gameid = v.gameid AND pu.userid = ",
        )
        .bind(user_id)
        .push(&format!(
            ") AS rating, (SELECT {playtime} FROM plays pl WHERE pl.gameid = v.gameid AND pl.userid = "
        ))
        .bind(user_id)
        .push(") AS playtime FROM videogame v WHERE v.gameid IN (");
        push_library_game_ids(&mut b, user_id);
        b.push(") ORDER BY v.title ASC");

        LibraryGameStat::find_by_statement(b.build()).all(db).await
    }
}
