pub mod collections_repository;
pub mod games_repository;
pub mod platforms_repository;
pub mod plays_repository;
pub mod popularity_repository;
pub mod ratings_repository;
pub mod social_repository;
pub mod stats_repository;
pub mod users_repository;

use crate::database::sql::SqlBuilder;

/// 追加“用户库”游戏 ID 子查询：合集中的、玩过的、评过分的游戏
pub(crate) fn push_library_game_ids(b: &mut SqlBuilder, user_id: i32) {
    b.push(
        "SELECT cg.gameid FROM collectiongame cg \
         JOIN collection c ON c.collectionid = cg.collectionid \
         WHERE c.userid = ",
    )
    .bind(user_id)
    .push(" UNION SELECT pl.gameid FROM plays pl WHERE pl.userid = ")
    .bind(user_id)
    .push(" UNION SELECT pu.gameid FROM purchases pu WHERE pu.userid = ")
    .bind(user_id);
}
