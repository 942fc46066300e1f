//! 预导入模块
//!
//! 提供常用实体的快捷导入。

pub use super::collection::Entity as Collection;
pub use super::collection_game::Entity as CollectionGame;
pub use super::company::Entity as Company;
pub use super::follows::Entity as Follows;
pub use super::game_developer::Entity as GameDeveloper;
pub use super::game_genre::Entity as GameGenre;
pub use super::game_platform::Entity as GamePlatform;
pub use super::game_publisher::Entity as GamePublisher;
pub use super::genre::Entity as Genre;
pub use super::platform::Entity as Platform;
pub use super::plays::Entity as Plays;
pub use super::purchases::Entity as Purchases;
pub use super::user_platform::Entity as UserPlatform;
pub use super::users::Entity as Users;
pub use super::videogame::Entity as Videogame;
