use sea_orm::*;

use crate::database::dto::SearchRow;
use crate::database::sql::SqlBuilder;
use crate::entity::prelude::*;
use crate::entity::{game_platform, videogame};
use crate::search::SearchFilters;

/// 游戏数据仓库
pub struct GamesRepository;

impl GamesRepository {
    /// 根据 ID 查询游戏
    pub async fn find_by_id<C: ConnectionTrait>(
        db: &C,
        id: i32,
    ) -> Result<Option<videogame::Model>, DbErr> {
        Videogame::find_by_id(id).one(db).await
    }

    /// 游戏支持的平台 ID
    pub async fn platform_ids<C: ConnectionTrait>(db: &C, game_id: i32) -> Result<Vec<i32>, DbErr> {
        GamePlatform::find()
            .select_only()
            .column(game_platform::Column::PlatformId)
            .filter(game_platform::Column::GameId.eq(game_id))
            .into_tuple::<i32>()
            .all(db)
            .await
    }

    /// 执行组合条件搜索
    pub async fn search<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchRow>, DbErr> {
        let stmt = build_search(db.get_database_backend(), user_id, filters);
        SearchRow::find_by_statement(stmt).all(db).await
    }
}

/// 构建搜索语句
///
/// 每个给出的过滤条件追加一个谓词，未给出的条件不产生任何谓词。
/// 多值关联（平台、开发商、发行商）通过相关子查询聚合，
/// 因此过滤条件不会影响展示的列表，游玩时长也不会因连接而被重复累计。
pub(crate) fn build_search(
    backend: DatabaseBackend,
    user_id: i32,
    filters: &SearchFilters,
) -> Statement {
    let mut b = SqlBuilder::new(backend);

    let platforms = b.string_agg("p.name");
    let developers = b.string_agg("c.name");
    let publishers = b.string_agg("c.name");
    let playtime = b.as_bigint("COALESCE(SUM(pl.duration), 0)");
    let year = b.year_of("gp.releasedate");
    let price = b.as_double("MIN(gp.price)");

    b.push("SELECT v.gameid AS game_id, v.title AS title, v.esrb_rating AS esrb_rating, ")
        .push(&format!(
            "(SELECT {platforms} FROM platform p WHERE p.platformid IN \
             (SELECT gp.platformid FROM gameplatform gp WHERE gp.gameid = v.gameid)) AS platforms, "
        ))
        .push(&format!(
            "(SELECT {developers} FROM company c WHERE c.companyid IN \
             (SELECT gd.companyid FROM gamedeveloper gd WHERE gd.gameid = v.gameid)) AS developers, "
        ))
        .push(&format!(
            "(SELECT {publishers} FROM company c WHERE c.companyid IN \
             (SELECT gpub.companyid FROM gamepublisher gpub WHERE gpub.gameid = v.gameid)) AS publishers, "
        ))
        .push(&format!(
            "(SELECT {playtime} FROM plays pl WHERE pl.gameid = v.gameid AND pl.userid = "
        ))
        .bind(user_id)
        .push(") AS playtime, ")
        .push("(SELECT pu.starrating FROM purchases pu WHERE pu.gameid = v.gameid AND pu.userid = ")
        .bind(user_id)
        .push(") AS my_rating, ")
        .push(&format!(
            "(SELECT MIN({year}) FROM gameplatform gp WHERE gp.gameid = v.gameid) AS release_year, "
        ))
        .push(&format!(
            "(SELECT {price} FROM gameplatform gp WHERE gp.gameid = v.gameid) AS min_price, "
        ))
        .push("(SELECT MIN(gp.releasedate) FROM gameplatform gp WHERE gp.gameid = v.gameid) AS first_release ")
        .push("FROM videogame v WHERE 1=1");

    if let Some(title) = &filters.title {
        b.push(" AND ");
        b.push_contains("v.title", title);
    }

    if let Some(developer) = &filters.developer {
        b.push(
            " AND EXISTS (SELECT 1 FROM gamedeveloper gd \
             JOIN company c ON c.companyid = gd.companyid \
             WHERE gd.gameid = v.gameid AND ",
        );
        b.push_contains("c.name", developer).push(")");
    }

    if let Some(publisher) = &filters.publisher {
        b.push(
            " AND EXISTS (SELECT 1 FROM gamepublisher gpub \
             JOIN company c ON c.companyid = gpub.companyid \
             WHERE gpub.gameid = v.gameid AND ",
        );
        b.push_contains("c.name", publisher).push(")");
    }

    if let Some(genre) = &filters.genre {
        b.push(
            " AND EXISTS (SELECT 1 FROM gamegenre gg \
             JOIN genres g ON g.genreid = gg.genreid \
             WHERE gg.gameid = v.gameid AND ",
        );
        b.push_contains("g.name", genre).push(")");
    }

    // 平台、年份、价格必须由同一条平台发行记录满足
    if filters.platform.is_some() || filters.year.is_some() || filters.max_price.is_some() {
        b.push(
            " AND EXISTS (SELECT 1 FROM gameplatform gp \
             JOIN platform p ON p.platformid = gp.platformid \
             WHERE gp.gameid = v.gameid",
        );
        if let Some(platform) = &filters.platform {
            b.push(" AND ");
            b.push_contains("p.name", platform);
        }
        if let Some(y) = filters.year {
            b.push(" AND ").push(&year).push(" = ").bind(y);
        }
        if let Some(max) = filters.max_price {
            b.push(" AND gp.price <= ").bind(max);
        }
        b.push(")");
    }

    b.push(" ORDER BY v.title ASC, first_release ASC");
    b.build()
}
