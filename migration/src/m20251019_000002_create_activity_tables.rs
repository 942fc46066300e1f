//! 用户与活动相关表
//!
//! 包含账户、合集、游玩记录、评分、关注关系和用户拥有的平台。
//! 唯一约束与外键负责维护数据不变量，应用层只负责把违反约束的错误转换为友好提示。

use sea_orm_migration::prelude::*;

use crate::m20251019_000001_create_catalog_tables::{Platform, Videogame};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. 用户表（用户名、邮箱唯一）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Userid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Firstname).text().not_null())
                    .col(ColumnDef::new(Users::Lastname).text().not_null())
                    .col(ColumnDef::new(Users::Email).text().not_null().unique_key())
                    .col(ColumnDef::new(Users::Username).text().not_null().unique_key())
                    .col(ColumnDef::new(Users::Password).text().not_null())
                    .col(ColumnDef::new(Users::Creationdate).date_time().not_null())
                    .col(ColumnDef::new(Users::Lastaccessdate).date_time().null())
                    .to_owned(),
            )
            .await?;

        // 2. 合集表：同一用户下名称唯一
        manager
            .create_table(
                Table::create()
                    .table(Collection::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Collection::Collectionid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Collection::Userid).integer().not_null())
                    .col(ColumnDef::new(Collection::Name).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collection_user")
                            .from(Collection::Table, Collection::Userid)
                            .to(Users::Table, Users::Userid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_collection_user_name")
                    .table(Collection::Table)
                    .col(Collection::Userid)
                    .col(Collection::Name)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // 3. 合集-游戏关联
        manager
            .create_table(
                Table::create()
                    .table(Collectiongame::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Collectiongame::Collectionid).integer().not_null())
                    .col(ColumnDef::new(Collectiongame::Gameid).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(Collectiongame::Collectionid)
                            .col(Collectiongame::Gameid),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collectiongame_collection")
                            .from(Collectiongame::Table, Collectiongame::Collectionid)
                            .to(Collection::Table, Collection::Collectionid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collectiongame_game")
                            .from(Collectiongame::Table, Collectiongame::Gameid)
                            .to(Videogame::Table, Videogame::Gameid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 4. 游玩记录（只追加）
        manager
            .create_table(
                Table::create()
                    .table(Plays::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Plays::Userid).integer().not_null())
                    .col(ColumnDef::new(Plays::Gameid).integer().not_null())
                    .col(ColumnDef::new(Plays::Playdatetime).date_time().not_null())
                    .col(ColumnDef::new(Plays::Duration).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(Plays::Userid)
                            .col(Plays::Gameid)
                            .col(Plays::Playdatetime),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plays_user")
                            .from(Plays::Table, Plays::Userid)
                            .to(Users::Table, Users::Userid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plays_game")
                            .from(Plays::Table, Plays::Gameid)
                            .to(Videogame::Table, Videogame::Gameid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .check(Expr::col(Plays::Duration).gt(0))
                    .to_owned(),
            )
            .await?;

        // 5. 购买/评分：每个 (用户, 游戏) 至多一条
        manager
            .create_table(
                Table::create()
                    .table(Purchases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Purchases::Userid).integer().not_null())
                    .col(ColumnDef::new(Purchases::Gameid).integer().not_null())
                    .col(ColumnDef::new(Purchases::Starrating).integer().null())
                    .primary_key(Index::create().col(Purchases::Userid).col(Purchases::Gameid))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchases_user")
                            .from(Purchases::Table, Purchases::Userid)
                            .to(Users::Table, Users::Userid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchases_game")
                            .from(Purchases::Table, Purchases::Gameid)
                            .to(Videogame::Table, Videogame::Gameid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 6. 关注关系：有向，不允许关注自己
        manager
            .create_table(
                Table::create()
                    .table(Follows::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Follows::Followerid).integer().not_null())
                    .col(ColumnDef::new(Follows::Followedid).integer().not_null())
                    .col(ColumnDef::new(Follows::Followdate).date_time().not_null())
                    .primary_key(
                        Index::create()
                            .col(Follows::Followerid)
                            .col(Follows::Followedid),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follows_follower")
                            .from(Follows::Table, Follows::Followerid)
                            .to(Users::Table, Users::Userid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follows_followed")
                            .from(Follows::Table, Follows::Followedid)
                            .to(Users::Table, Users::Userid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .check(Expr::col(Follows::Followerid).ne(Expr::col(Follows::Followedid)))
                    .to_owned(),
            )
            .await?;

        // 7. 用户拥有的平台
        manager
            .create_table(
                Table::create()
                    .table(Userplatform::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Userplatform::Userid).integer().not_null())
                    .col(ColumnDef::new(Userplatform::Platformid).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(Userplatform::Userid)
                            .col(Userplatform::Platformid),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_userplatform_user")
                            .from(Userplatform::Table, Userplatform::Userid)
                            .to(Users::Table, Users::Userid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_userplatform_platform")
                            .from(Userplatform::Table, Userplatform::Platformid)
                            .to(Platform::Table, Platform::Platformid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        log::info!("用户活动表已就绪");
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Userplatform::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Follows::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Purchases::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Plays::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Collectiongame::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Collection::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Userid,
    Firstname,
    Lastname,
    Email,
    Username,
    Password,
    Creationdate,
    Lastaccessdate,
}

#[derive(DeriveIden)]
enum Collection {
    Table,
    Collectionid,
    Userid,
    Name,
}

#[derive(DeriveIden)]
enum Collectiongame {
    Table,
    Collectionid,
    Gameid,
}

#[derive(DeriveIden)]
enum Plays {
    Table,
    Userid,
    Gameid,
    Playdatetime,
    Duration,
}

#[derive(DeriveIden)]
enum Purchases {
    Table,
    Userid,
    Gameid,
    Starrating,
}

#[derive(DeriveIden)]
enum Follows {
    Table,
    Followerid,
    Followedid,
    Followdate,
}

#[derive(DeriveIden)]
enum Userplatform {
    Table,
    Userid,
    Platformid,
}
