//! 游戏目录相关表
//!
//! 目录数据（游戏、平台、厂商、类型及其多对多关联）由外部数据库维护，
//! 此迁移仅用于本地 SQLite 数据库或空的 Postgres 数据库初始化。
//! 所有表均使用 `if_not_exists`，对已有 schema 无副作用。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. 游戏表
        manager
            .create_table(
                Table::create()
                    .table(Videogame::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Videogame::Gameid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Videogame::Title).text().not_null())
                    .col(ColumnDef::new(Videogame::EsrbRating).text().null())
                    .to_owned(),
            )
            .await?;

        // 2. 平台 / 厂商 / 类型字典表
        manager
            .create_table(
                Table::create()
                    .table(Platform::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Platform::Platformid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Platform::Name).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Company::Companyid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Company::Name).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Genres::Genreid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Genres::Name).text().not_null())
                    .to_owned(),
            )
            .await?;

        // 3. 游戏-平台关联（携带发行日期与价格）
        manager
            .create_table(
                Table::create()
                    .table(Gameplatform::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Gameplatform::Gameid).integer().not_null())
                    .col(ColumnDef::new(Gameplatform::Platformid).integer().not_null())
                    .col(ColumnDef::new(Gameplatform::Releasedate).date().null())
                    .col(ColumnDef::new(Gameplatform::Price).double().null())
                    .primary_key(
                        Index::create()
                            .col(Gameplatform::Gameid)
                            .col(Gameplatform::Platformid),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gameplatform_game")
                            .from(Gameplatform::Table, Gameplatform::Gameid)
                            .to(Videogame::Table, Videogame::Gameid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gameplatform_platform")
                            .from(Gameplatform::Table, Gameplatform::Platformid)
                            .to(Platform::Table, Platform::Platformid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 4. 开发商 / 发行商 / 类型关联表结构一致
        create_company_edge(manager, GAME_DEVELOPER).await?;
        create_company_edge(manager, GAME_PUBLISHER).await?;

        manager
            .create_table(
                Table::create()
                    .table(Gamegenre::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Gamegenre::Gameid).integer().not_null())
                    .col(ColumnDef::new(Gamegenre::Genreid).integer().not_null())
                    .primary_key(Index::create().col(Gamegenre::Gameid).col(Gamegenre::Genreid))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gamegenre_game")
                            .from(Gamegenre::Table, Gamegenre::Gameid)
                            .to(Videogame::Table, Videogame::Gameid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gamegenre_genre")
                            .from(Gamegenre::Table, Gamegenre::Genreid)
                            .to(Genres::Table, Genres::Genreid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        log::info!("游戏目录表已就绪");
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 先删关联表，再删字典表
        manager
            .drop_table(Table::drop().table(Gamegenre::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alias::new(GAME_PUBLISHER)).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alias::new(GAME_DEVELOPER)).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Gameplatform::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genres::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Company::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Platform::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Videogame::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

const GAME_DEVELOPER: &str = "gamedeveloper";
const GAME_PUBLISHER: &str = "gamepublisher";

/// 创建 (gameid, companyid) 形式的厂商关联表
async fn create_company_edge(manager: &SchemaManager<'_>, name: &str) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(Alias::new(name))
                .if_not_exists()
                .col(ColumnDef::new(CompanyEdge::Gameid).integer().not_null())
                .col(ColumnDef::new(CompanyEdge::Companyid).integer().not_null())
                .primary_key(
                    Index::create()
                        .col(CompanyEdge::Gameid)
                        .col(CompanyEdge::Companyid),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name(format!("fk_{name}_game"))
                        .from(Alias::new(name), CompanyEdge::Gameid)
                        .to(Videogame::Table, Videogame::Gameid)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name(format!("fk_{name}_company"))
                        .from(Alias::new(name), CompanyEdge::Companyid)
                        .to(Company::Table, Company::Companyid)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await
}

#[derive(DeriveIden)]
pub(crate) enum Videogame {
    Table,
    Gameid,
    Title,
    EsrbRating,
}

#[derive(DeriveIden)]
pub(crate) enum Platform {
    Table,
    Platformid,
    Name,
}

#[derive(DeriveIden)]
enum Company {
    Table,
    Companyid,
    Name,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Genreid,
    Name,
}

#[derive(DeriveIden)]
enum Gameplatform {
    Table,
    Gameid,
    Platformid,
    Releasedate,
    Price,
}

#[derive(DeriveIden)]
enum CompanyEdge {
    Gameid,
    Companyid,
}

#[derive(DeriveIden)]
enum Gamegenre {
    Table,
    Gameid,
    Genreid,
}
