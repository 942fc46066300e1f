use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::*;

use crate::database::dto::{CandidateGame, NewRelease, PopularGame, TasteCount};
use crate::database::repository::push_library_game_ids;
use crate::database::sql::SqlBuilder;

/// 热门榜单与推荐相关查询
pub struct PopularityRepository;

/// 用户偏好的统计维度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TasteKind {
    Genre,
    Developer,
}

impl TasteKind {
    /// (关联表, 关联列, 名称表, 名称表主键)
    fn tables(self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            TasteKind::Genre => ("gamegenre", "genreid", "genres", "genreid"),
            TasteKind::Developer => ("gamedeveloper", "companyid", "company", "companyid"),
        }
    }
}

impl PopularityRepository {
    /// 某个时间点之后总游玩时长最高的游戏
    pub async fn popular_since<C: ConnectionTrait>(
        db: &C,
        since: NaiveDateTime,
        limit: u64,
    ) -> Result<Vec<PopularGame>, DbErr> {
        let mut b = SqlBuilder::new(db.get_database_backend());
        push_popular_select(&mut b);
        b.push(" WHERE pl.playdatetime >= ").bind(since);
        push_popular_tail(&mut b, limit);

        PopularGame::find_by_statement(b.build()).all(db).await
    }

    /// 关注对象中总游玩时长最高的游戏
    pub async fn popular_among_followed<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<PopularGame>, DbErr> {
        let mut b = SqlBuilder::new(db.get_database_backend());
        push_popular_select(&mut b);
        b.push(" JOIN follows f ON f.followedid = pl.userid WHERE f.followerid = ")
            .bind(user_id);
        push_popular_tail(&mut b, limit);

        PopularGame::find_by_statement(b.build()).all(db).await
    }

    /// `[from, until)` 期间发行的游戏，按总游玩时长、发行日期排序
    pub async fn released_between<C: ConnectionTrait>(
        db: &C,
        from: NaiveDate,
        until: NaiveDate,
        limit: u64,
    ) -> Result<Vec<NewRelease>, DbErr> {
        let mut b = SqlBuilder::new(db.get_database_backend());
        let total = b.as_bigint("COALESCE(SUM(pl.duration), 0)");

        b.push(&format!(
            "SELECT v.gameid AS game_id, v.title AS title, MAX(gp.releasedate) AS release_date, \
             (SELECT {total} FROM plays pl WHERE pl.gameid = v.gameid) AS total_minutes \
             FROM videogame v JOIN gameplatform gp ON gp.gameid = v.gameid \
             WHERE gp.releasedate >= "
        ))
        .bind(from)
        .push(" AND gp.releasedate < ")
        .bind(until)
        .push(&format!(
            " GROUP BY v.gameid, v.title \
             ORDER BY total_minutes DESC, release_date DESC, v.title ASC LIMIT {limit}"
        ));

        NewRelease::find_by_statement(b.build()).all(db).await
    }

    /// 用户库中出现次数最多的类型或开发商
    pub async fn top_tastes<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        kind: TasteKind,
        limit: u64,
    ) -> Result<Vec<TasteCount>, DbErr> {
        let (edge, key, names, pk) = kind.tables();
        let mut b = SqlBuilder::new(db.get_database_backend());
        let occurrences = b.as_bigint("COUNT(DISTINCT e.gameid)");

        b.push(&format!(
            "SELECT n.{pk} AS id, n.name AS name, {occurrences} AS occurrences \
             FROM {edge} e JOIN {names} n ON n.{pk} = e.{key} \
             WHERE e.gameid IN ("
        ));
        push_library_game_ids(&mut b, user_id);
        b.push(&format!(
            ") GROUP BY n.{pk}, n.name ORDER BY occurrences DESC, n.{pk} ASC LIMIT {limit}"
        ));

        TasteCount::find_by_statement(b.build()).all(db).await
    }

    /// 用户库之外、命中任一偏好类型或开发商的游戏
    pub async fn candidates<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        genre_ids: &[i32],
        developer_ids: &[i32],
    ) -> Result<Vec<CandidateGame>, DbErr> {
        if genre_ids.is_empty() && developer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut b = SqlBuilder::new(db.get_database_backend());
        let avg = avg_rating_expr(&b);
        let hit = format!("THEN {} ELSE {} END", b.as_bigint("1"), b.as_bigint("0"));

        b.push("SELECT v.gameid AS game_id, v.title AS title, CASE WHEN ");
        push_taste_exists(&mut b, TasteKind::Genre, genre_ids);
        b.push(&format!(" {hit} AS genre_hit, CASE WHEN "));
        push_taste_exists(&mut b, TasteKind::Developer, developer_ids);
        b.push(&format!(" {hit} AS developer_hit, {avg} AS avg_rating "))
            .push("FROM videogame v WHERE v.gameid NOT IN (");
        push_library_game_ids(&mut b, user_id);
        b.push(") AND (");
        push_taste_exists(&mut b, TasteKind::Genre, genre_ids);
        b.push(" OR ");
        push_taste_exists(&mut b, TasteKind::Developer, developer_ids);
        b.push(")");

        CandidateGame::find_by_statement(b.build()).all(db).await
    }

    /// 用户库之外平均评分不低于 `min_avg` 的游戏
    pub async fn highly_rated_outside_library<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        min_avg: f64,
        limit: u64,
    ) -> Result<Vec<CandidateGame>, DbErr> {
        let mut b = SqlBuilder::new(db.get_database_backend());
        let zero = b.as_bigint("0");
        let rating = b.as_double("pu.starrating");

        b.push(&format!(
            "SELECT v.gameid AS game_id, v.title AS title, {zero} AS genre_hit, \
             {zero} AS developer_hit, r.avg_rating AS avg_rating \
             FROM videogame v JOIN (\
             SELECT pu.gameid AS gameid, AVG({rating}) AS avg_rating \
             FROM purchases pu WHERE pu.starrating IS NOT NULL GROUP BY pu.gameid\
             ) r ON r.gameid = v.gameid \
             WHERE r.avg_rating >= "
        ))
        .bind(min_avg)
        .push(" AND v.gameid NOT IN (");
        push_library_game_ids(&mut b, user_id);
        b.push(&format!(
            ") ORDER BY r.avg_rating DESC, v.title ASC LIMIT {limit}"
        ));

        CandidateGame::find_by_statement(b.build()).all(db).await
    }
}

fn push_popular_select(b: &mut SqlBuilder) {
    let total = b.as_bigint("SUM(pl.duration)");
    let players = b.as_bigint("COUNT(DISTINCT pl.userid)");
    b.push(&format!(
        "SELECT v.gameid AS game_id, v.title AS title, {total} AS total_minutes, \
         {players} AS players \
         FROM plays pl JOIN videogame v ON v.gameid = pl.gameid"
    ));
}

fn push_popular_tail(b: &mut SqlBuilder, limit: u64) {
    b.push(&format!(
        " GROUP BY v.gameid, v.title ORDER BY total_minutes DESC, v.title ASC LIMIT {limit}"
    ));
}

/// 所有评分的平均值（无评分时为 NULL）
fn avg_rating_expr(b: &SqlBuilder) -> String {
    let rating = b.as_double("pu.starrating");
    format!(
        "(SELECT AVG({rating}) FROM purchases pu \
         WHERE pu.gameid = v.gameid AND pu.starrating IS NOT NULL)"
    )
}

/// 追加“游戏命中偏好列表”谓词，空列表视为不命中
fn push_taste_exists(b: &mut SqlBuilder, kind: TasteKind, ids: &[i32]) {
    if ids.is_empty() {
        b.push("1 = 0");
        return;
    }

    let (edge, key, _, _) = kind.tables();
    b.push(&format!(
        "EXISTS (SELECT 1 FROM {edge} e WHERE e.gameid = v.gameid AND e.{key} IN ("
    ));
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            b.push(", ");
        }
        b.bind(*id);
    }
    b.push("))");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_taste_list_never_matches() {
        let mut b = SqlBuilder::new(DatabaseBackend::Sqlite);
        push_taste_exists(&mut b, TasteKind::Genre, &[]);
        assert_eq!(b.sql(), "1 = 0");
        assert!(b.values().is_empty());
    }

    #[test]
    fn taste_list_binds_each_id() {
        let mut b = SqlBuilder::new(DatabaseBackend::Postgres);
        push_taste_exists(&mut b, TasteKind::Developer, &[3, 9]);
        assert_eq!(
            b.sql(),
            "EXISTS (SELECT 1 FROM gamedeveloper e WHERE e.gameid = v.gameid AND e.companyid IN ($1, $2))"
        );
    }
}
