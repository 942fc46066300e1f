//! 业务服务层
//!
//! 每个写操作都在独立事务中执行：任何一步出错时事务被丢弃并自动回滚。
//! 事务期间只通过事务句柄访问数据库（连接池只有一个连接）。

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use rand::seq::SliceRandom;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::database::dto::{
    ActivityEntry, CollectionSummary, FollowEntry, GameBrief, NewRelease, NewUser, PlatformCheck,
    PlayRecord, PopularGame, ProfileSummary, RecommendationReport, UserMatch,
};
use crate::database::repository::{
    collections_repository::CollectionsRepository,
    games_repository::GamesRepository,
    platforms_repository::PlatformsRepository,
    plays_repository::PlaysRepository,
    popularity_repository::{PopularityRepository, TasteKind},
    ratings_repository::RatingsRepository,
    social_repository::{FollowDirection, SocialRepository},
    stats_repository::StatsRepository,
    users_repository::UsersRepository,
};
use crate::entity::{collection, platform, users, videogame};
use crate::error::{Result, TrackerError, on_foreign_key_violation, on_unique_violation};
use crate::ranking::{self, RankedGame, TopMode};
use crate::search::{SearchFilters, SearchResults};
use crate::session::Session;
use crate::utils::crypto::{check_password, hash_password};

pub const POPULAR_WINDOW_DAYS: i64 = 90;
pub const POPULAR_LIMIT: u64 = 20;
pub const NEW_RELEASES_LIMIT: u64 = 5;

const DUPLICATE_ACCOUNT: &str = "Username or email already exists.";
const DUPLICATE_COLLECTION: &str = "A collection with this name already exists.";

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn required_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::validation(
            "Please enter a name for the collection.",
        ));
    }
    Ok(trimmed)
}

fn validate_minutes(minutes: i32) -> Result<()> {
    if minutes < 1 {
        return Err(TrackerError::validation(
            "Play time must be at least 1 minute.",
        ));
    }
    Ok(())
}

fn validate_stars(stars: i32) -> Result<()> {
    if !(1..=5).contains(&stars) {
        return Err(TrackerError::validation("Rating must be between 1 and 5."));
    }
    Ok(())
}

/// 当月第一天与下月第一天
fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    let end = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(start);
    (start, end)
}

/// 游戏库服务
pub struct TrackerService {
    db: DatabaseConnection,
}

impl TrackerService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn into_connection(self) -> DatabaseConnection {
        self.db
    }

    // ==================== 账户 ====================

    /// 注册新账户
    pub async fn register(&self, input: &NewUser) -> Result<users::Model> {
        if !input.is_complete() {
            return Err(TrackerError::validation("Please fill in all fields."));
        }

        let password_hash = hash_password(&input.password);
        let txn = self.db.begin().await?;
        let user = UsersRepository::create(&txn, input, password_hash, now())
            .await
            .map_err(|e| on_unique_violation(e, DUPLICATE_ACCOUNT))?;
        txn.commit().await?;

        log::info!("新用户注册: {}", user.username);
        Ok(user)
    }

    /// 登录，成功时更新最后访问时间并返回会话
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(TrackerError::validation(
                "Please enter both username and password.",
            ));
        }

        let txn = self.db.begin().await?;
        let user = UsersRepository::find_by_username(&txn, username)
            .await?
            .filter(|u| check_password(&u.password, password))
            .ok_or(TrackerError::InvalidCredentials)?;
        UsersRepository::touch_last_access(&txn, user.id, now()).await?;
        txn.commit().await?;

        log::info!("用户登录: {}", user.username);
        Ok(Session::new(user.id, user.username, user.first_name))
    }

    /// 登出，会话及其缓存的搜索结果一并丢弃
    pub fn logout(&self, session: Session) {
        log::info!("用户登出: {}", session.username());
    }

    // ==================== 合集 ====================

    pub async fn list_collections(&self, session: &Session) -> Result<Vec<CollectionSummary>> {
        Ok(CollectionsRepository::list_summaries(&self.db, session.user_id()).await?)
    }

    async fn owned_collection<C: ConnectionTrait>(
        db: &C,
        session: &Session,
        collection_id: i32,
    ) -> Result<collection::Model> {
        CollectionsRepository::find_owned(db, session.user_id(), collection_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Collection not found."))
    }

    async fn existing_game<C: ConnectionTrait>(db: &C, game_id: i32) -> Result<videogame::Model> {
        GamesRepository::find_by_id(db, game_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Game not found."))
    }

    pub async fn create_collection(
        &self,
        session: &Session,
        name: &str,
    ) -> Result<collection::Model> {
        let name = required_name(name)?;
        let txn = self.db.begin().await?;
        let created = CollectionsRepository::create(&txn, session.user_id(), name)
            .await
            .map_err(|e| on_unique_violation(e, DUPLICATE_COLLECTION))?;
        txn.commit().await?;

        log::debug!("创建合集 {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn rename_collection(
        &self,
        session: &Session,
        collection_id: i32,
        name: &str,
    ) -> Result<collection::Model> {
        let name = required_name(name)?;
        let txn = self.db.begin().await?;
        let existing = Self::owned_collection(&txn, session, collection_id).await?;
        let renamed = CollectionsRepository::rename(&txn, existing, name)
            .await
            .map_err(|e| on_unique_violation(e, DUPLICATE_COLLECTION))?;
        txn.commit().await?;
        Ok(renamed)
    }

    /// 删除合集（游戏本身不会被删除）
    pub async fn delete_collection(
        &self,
        session: &Session,
        collection_id: i32,
    ) -> Result<collection::Model> {
        let txn = self.db.begin().await?;
        let existing = Self::owned_collection(&txn, session, collection_id).await?;
        CollectionsRepository::delete(&txn, existing.id).await?;
        txn.commit().await?;

        log::debug!("删除合集 {} ({})", existing.name, existing.id);
        Ok(existing)
    }

    /// 合集详情：合集本身以及其中的游戏
    pub async fn collection_games(
        &self,
        session: &Session,
        collection_id: i32,
    ) -> Result<(collection::Model, Vec<GameBrief>)> {
        let found = Self::owned_collection(&self.db, session, collection_id).await?;
        let games = CollectionsRepository::games_in_collection(&self.db, found.id).await?;
        Ok((found, games))
    }

    /// 检查用户是否拥有该游戏的任一平台
    pub async fn check_platforms(&self, session: &Session, game_id: i32) -> Result<PlatformCheck> {
        Self::existing_game(&self.db, game_id).await?;
        let owned = PlatformsRepository::owned_ids(&self.db, session.user_id()).await?;
        let supported = GamesRepository::platform_ids(&self.db, game_id).await?;

        if supported.iter().any(|p| owned.contains(p)) {
            Ok(PlatformCheck::Owned)
        } else {
            Ok(PlatformCheck::NotOwned)
        }
    }

    /// 将游戏加入合集（调用方负责平台检查与确认）
    pub async fn add_game_to_collection(
        &self,
        session: &Session,
        collection_id: i32,
        game_id: i32,
    ) -> Result<(collection::Model, videogame::Model)> {
        let txn = self.db.begin().await?;
        let target = Self::owned_collection(&txn, session, collection_id).await?;
        let game = Self::existing_game(&txn, game_id).await?;

        let duplicate = || {
            TrackerError::Conflict(format!("'{}' is already in that collection.", game.title))
        };
        if CollectionsRepository::contains_game(&txn, target.id, game.id).await? {
            return Err(duplicate());
        }
        CollectionsRepository::add_game(&txn, target.id, game.id)
            .await
            .map_err(|e| match on_unique_violation(e, "") {
                TrackerError::Conflict(_) => duplicate(),
                other => other,
            })?;
        txn.commit().await?;

        Ok((target, game))
    }

    pub async fn remove_game_from_collection(
        &self,
        session: &Session,
        collection_id: i32,
        game_id: i32,
    ) -> Result<()> {
        let txn = self.db.begin().await?;
        let target = Self::owned_collection(&txn, session, collection_id).await?;
        let removed = CollectionsRepository::remove_game(&txn, target.id, game_id).await?;
        if removed == 0 {
            return Err(TrackerError::not_found("That game is not in this collection."));
        }
        txn.commit().await?;
        Ok(())
    }

    /// 从合集中随机挑选一个游戏并记录游玩
    pub async fn play_random(
        &self,
        session: &Session,
        collection_id: i32,
        minutes: i32,
    ) -> Result<videogame::Model> {
        let txn = self.db.begin().await?;
        let source = Self::owned_collection(&txn, session, collection_id).await?;
        let game_ids = CollectionsRepository::game_ids(&txn, source.id).await?;
        let picked = *game_ids
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| TrackerError::EmptyCollection(source.name.clone()))?;
        validate_minutes(minutes)?;

        let game = Self::existing_game(&txn, picked).await?;
        PlaysRepository::insert(&txn, session.user_id(), game.id, now(), minutes).await?;
        txn.commit().await?;

        log::debug!("随机游玩: {} -> {}", source.name, game.title);
        Ok(game)
    }

    // ==================== 平台 ====================

    pub async fn list_platforms(&self) -> Result<Vec<platform::Model>> {
        Ok(PlatformsRepository::find_all(&self.db).await?)
    }

    pub async fn my_platforms(&self, session: &Session) -> Result<Vec<platform::Model>> {
        Ok(PlatformsRepository::owned_by_user(&self.db, session.user_id()).await?)
    }

    pub async fn add_platform(&self, session: &Session, platform_id: i32) -> Result<platform::Model> {
        let txn = self.db.begin().await?;
        let found = PlatformsRepository::find_by_id(&txn, platform_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Platform not found."))?;
        PlatformsRepository::add_owned(&txn, session.user_id(), found.id)
            .await
            .map_err(|e| {
                on_unique_violation(e, format!("You already own {}.", found.name))
            })?;
        txn.commit().await?;
        Ok(found)
    }

    pub async fn remove_platform(&self, session: &Session, platform_id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        let removed =
            PlatformsRepository::remove_owned(&txn, session.user_id(), platform_id).await?;
        if removed == 0 {
            return Err(TrackerError::not_found("You do not own that platform."));
        }
        txn.commit().await?;
        Ok(())
    }

    // ==================== 游玩与评分 ====================

    /// 记录一次游玩（时长单位：分钟）
    pub async fn log_play(
        &self,
        session: &Session,
        game_id: i32,
        minutes: i32,
    ) -> Result<videogame::Model> {
        validate_minutes(minutes)?;
        let txn = self.db.begin().await?;
        let game = Self::existing_game(&txn, game_id).await?;
        PlaysRepository::insert(&txn, session.user_id(), game.id, now(), minutes)
            .await
            .map_err(|e| on_foreign_key_violation(e, "Game not found."))?;
        txn.commit().await?;

        log::debug!("记录游玩 {} 分钟: {}", minutes, game.title);
        Ok(game)
    }

    /// 评分（1-5 星），重复评分覆盖旧值
    pub async fn rate_game(
        &self,
        session: &Session,
        game_id: i32,
        stars: i32,
    ) -> Result<videogame::Model> {
        validate_stars(stars)?;
        let txn = self.db.begin().await?;
        let game = Self::existing_game(&txn, game_id).await?;
        RatingsRepository::upsert(&txn, session.user_id(), game.id, stars).await?;
        txn.commit().await?;
        Ok(game)
    }

    pub async fn play_history(&self, session: &Session, limit: u64) -> Result<Vec<PlayRecord>> {
        Ok(PlaysRepository::recent_for_user(&self.db, session.user_id(), limit).await?)
    }

    // ==================== 搜索 ====================

    pub async fn search(&self, session: &Session, filters: &SearchFilters) -> Result<SearchResults> {
        let rows = GamesRepository::search(&self.db, session.user_id(), filters).await?;
        log::debug!("搜索 {:?} 返回 {} 条", filters, rows.len());
        Ok(SearchResults::new(rows))
    }

    // ==================== 社交 ====================

    /// 按邮箱搜索用户，空关键字不返回任何结果
    pub async fn search_users(&self, session: &Session, fragment: &str) -> Result<Vec<UserMatch>> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Ok(Vec::new());
        }
        Ok(SocialRepository::search_by_email(&self.db, session.user_id(), fragment).await?)
    }

    async fn existing_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<users::Model> {
        UsersRepository::find_by_id(db, user_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("User not found."))
    }

    pub async fn follow(&self, session: &Session, user_id: i32) -> Result<users::Model> {
        if user_id == session.user_id() {
            return Err(TrackerError::validation("You cannot follow yourself."));
        }

        let txn = self.db.begin().await?;
        let target = Self::existing_user(&txn, user_id).await?;
        let already = format!("You are already following {}.", target.username);
        if SocialRepository::is_following(&txn, session.user_id(), target.id).await? {
            return Err(TrackerError::Conflict(already));
        }
        SocialRepository::follow(&txn, session.user_id(), target.id, now())
            .await
            .map_err(|e| on_unique_violation(e, already))?;
        txn.commit().await?;

        log::debug!("{} 关注了 {}", session.username(), target.username);
        Ok(target)
    }

    pub async fn unfollow(&self, session: &Session, user_id: i32) -> Result<users::Model> {
        let txn = self.db.begin().await?;
        let target = Self::existing_user(&txn, user_id).await?;
        let removed = SocialRepository::unfollow(&txn, session.user_id(), target.id).await?;
        if removed == 0 {
            return Err(TrackerError::not_found(format!(
                "You are not following {}.",
                target.username
            )));
        }
        txn.commit().await?;
        Ok(target)
    }

    pub async fn following(&self, session: &Session) -> Result<Vec<FollowEntry>> {
        Ok(
            SocialRepository::list(&self.db, session.user_id(), FollowDirection::Following)
                .await?,
        )
    }

    pub async fn followers(&self, session: &Session) -> Result<Vec<FollowEntry>> {
        Ok(
            SocialRepository::list(&self.db, session.user_id(), FollowDirection::Followers)
                .await?,
        )
    }

    pub async fn following_activity(
        &self,
        session: &Session,
        limit: u64,
    ) -> Result<Vec<ActivityEntry>> {
        Ok(SocialRepository::followed_activity(&self.db, session.user_id(), limit).await?)
    }

    // ==================== 个人资料 ====================

    pub async fn profile(&self, session: &Session) -> Result<ProfileSummary> {
        let user = Self::existing_user(&self.db, session.user_id()).await?;
        let collections = CollectionsRepository::count_by_user(&self.db, user.id).await?;
        let followers = SocialRepository::count(&self.db, user.id, FollowDirection::Followers).await?;
        let following = SocialRepository::count(&self.db, user.id, FollowDirection::Following).await?;

        Ok(ProfileSummary {
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            collections,
            followers,
            following,
        })
    }

    pub async fn top_games(&self, session: &Session, mode: TopMode) -> Result<Vec<RankedGame>> {
        let stats = StatsRepository::library_stats(&self.db, session.user_id()).await?;
        Ok(ranking::rank_top_games(stats, mode))
    }

    // ==================== 热门与推荐 ====================

    /// 最近 90 天总游玩时长最高的游戏
    pub async fn popular_recent(&self, _session: &Session) -> Result<Vec<PopularGame>> {
        let since = now() - Duration::days(POPULAR_WINDOW_DAYS);
        Ok(PopularityRepository::popular_since(&self.db, since, POPULAR_LIMIT).await?)
    }

    pub async fn popular_among_followed(&self, session: &Session) -> Result<Vec<PopularGame>> {
        Ok(
            PopularityRepository::popular_among_followed(&self.db, session.user_id(), POPULAR_LIMIT)
                .await?,
        )
    }

    /// 本月发行的游戏
    pub async fn new_releases(&self, _session: &Session) -> Result<Vec<NewRelease>> {
        let (start, end) = month_bounds(Local::now().date_naive());
        Ok(
            PopularityRepository::released_between(&self.db, start, end, NEW_RELEASES_LIMIT)
                .await?,
        )
    }

    /// 基于用户最常见的类型和开发商推荐游戏，无命中时退回全局高评分游戏
    pub async fn recommend(&self, session: &Session) -> Result<RecommendationReport> {
        let user_id = session.user_id();
        let genres =
            PopularityRepository::top_tastes(&self.db, user_id, TasteKind::Genre, ranking::TOP_TASTES)
                .await?;
        let developers = PopularityRepository::top_tastes(
            &self.db,
            user_id,
            TasteKind::Developer,
            ranking::TOP_TASTES,
        )
        .await?;

        let genre_ids: Vec<i32> = genres.iter().map(|g| g.id).collect();
        let developer_ids: Vec<i32> = developers.iter().map(|d| d.id).collect();
        let candidates =
            PopularityRepository::candidates(&self.db, user_id, &genre_ids, &developer_ids).await?;

        let mut items = ranking::score_candidates(candidates);
        if items.is_empty() {
            log::debug!("没有匹配偏好的候选，使用高评分兜底列表");
            let rated = PopularityRepository::highly_rated_outside_library(
                &self.db,
                user_id,
                ranking::FALLBACK_MIN_AVERAGE,
                ranking::RECOMMENDATION_LIMIT as u64,
            )
            .await?;
            items = ranking::fallback_recommendations(rated);
        }

        Ok(RecommendationReport {
            top_genres: genres.into_iter().map(|g| g.name).collect(),
            top_developers: developers.into_iter().map(|d| d.name).collect(),
            items,
        })
    }
}
