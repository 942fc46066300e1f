//! 交互式终端
//!
//! 每个视图对应一个命令；命令缺少的参数以表单形式逐项询问。
//! 命令出错时打印错误并继续等待下一条命令。

pub mod command;
pub mod prompt;
pub mod render;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::io::AsyncBufRead;

use crate::database::TrackerService;
use crate::database::dto::{NewUser, PlatformCheck};
use crate::error::{Result, TrackerError};
use crate::ranking::TopMode;
use crate::search::{SearchInput, SortColumn};
use crate::session::Session;
use crate::utils::logs::{get_log_level, set_log_level};

use command::{Command, LOGGED_IN_HELP, LOGGED_OUT_HELP};
use prompt::Prompter;

/// 游玩记录与动态的显示条数
const HISTORY_LIMIT: u64 = 20;
const ACTIVITY_LIMIT: u64 = 20;

/// 命令执行后的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Logout,
    Quit,
}

/// 输入流在表单中途结束时放弃当前命令
macro_rules! or_cancel {
    ($value:expr) => {
        match $value {
            Some(v) => v,
            None => return Ok(Flow::Continue),
        }
    };
}

fn success(message: &str) {
    println!("{}", message.if_supports_color(Stdout, |t| t.green()));
}

fn notice(message: &str) {
    println!("{}", message.if_supports_color(Stdout, |t| t.yellow()));
}

fn report(err: &TrackerError) {
    if err.is_user_error() {
        notice(&err.to_string());
    } else {
        log::error!("{}", err);
        println!(
            "{} {}",
            "Error:".if_supports_color(Stdout, |t| t.red()),
            err
        );
    }
}

fn print_help(entries: &[(&str, &str)]) {
    let width = entries.iter().map(|(c, _)| c.len()).max().unwrap_or(0);
    for (cmd, about) in entries {
        let padded = format!("{:width$}", cmd, width = width);
        println!(
            "  {}  {}",
            padded.if_supports_color(Stdout, |t| t.cyan()),
            about
        );
    }
}

pub struct Shell<R> {
    service: TrackerService,
    prompt: Prompter<R>,
    session: Option<Session>,
}

impl<R: AsyncBufRead + Unpin> Shell<R> {
    pub fn new(service: TrackerService, input: R) -> Self {
        Self {
            service,
            prompt: Prompter::new(input),
            session: None,
        }
    }

    /// 从终端读取密码时不回显
    pub fn hide_passwords(mut self) -> Self {
        self.prompt = self.prompt.hide_secrets();
        self
    }

    pub fn into_service(self) -> TrackerService {
        self.service
    }

    /// 命令循环，直到 `quit` 或输入结束
    pub async fn run(&mut self) -> Result<()> {
        println!("{}", render::heading("Game Tracker"));
        println!("Type 'login' or 'register' to begin, 'help' for all commands.");

        loop {
            let prompt = match &self.session {
                Some(session) => format!(
                    "{}> ",
                    session.username().if_supports_color(Stdout, |t| t.cyan())
                ),
                None => "game-tracker> ".to_string(),
            };
            let Some(line) = self.prompt.read_line(&prompt).await? else {
                println!();
                break;
            };

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    notice(&message);
                    continue;
                }
            };

            match self.dispatch(command).await {
                Ok(Flow::Quit) => break,
                Ok(_) => {}
                Err(err) => report(&err),
            }
        }

        if let Some(session) = self.session.take() {
            self.service.logout(session);
        }
        println!("Goodbye!");
        Ok(())
    }

    async fn dispatch(&mut self, command: Command) -> Result<Flow> {
        if !command.requires_session() {
            return self.run_logged_out(command).await;
        }

        let Some(mut session) = self.session.take() else {
            notice("Please log in first. Type 'login' or 'register'.");
            return Ok(Flow::Continue);
        };
        let result = self.run_logged_in(command, &mut session).await;
        match result {
            Ok(Flow::Logout) => {
                println!("Logged out. See you soon, {}.", session.first_name());
                self.service.logout(session);
            }
            _ => self.session = Some(session),
        }
        result
    }

    // ==================== 登录前 ====================

    async fn run_logged_out(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Empty => {}
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                if self.session.is_some() {
                    print_help(LOGGED_IN_HELP);
                } else {
                    print_help(LOGGED_OUT_HELP);
                }
            }
            Command::LogLevel(level) => match level {
                None => println!("Current log level: {}", get_log_level()),
                Some(level) => {
                    let applied = set_log_level(&level).map_err(TrackerError::validation)?;
                    success(&format!("Log level set to {}.", applied));
                }
            },
            Command::Login | Command::Register if self.session.is_some() => {
                notice("You are already logged in. Type 'logout' first.");
            }
            Command::Login => return self.login().await,
            Command::Register => return self.register().await,
            // 其余命令都需要会话
            _ => {}
        }
        Ok(Flow::Continue)
    }

    async fn login(&mut self) -> Result<Flow> {
        let username = or_cancel!(self.prompt.field("Username").await?);
        let password = or_cancel!(self.prompt.secret("Password").await?);

        let session = self.service.login(&username, &password).await?;
        success(&format!("Welcome back, {}!", session.first_name()));
        self.session = Some(session);
        Ok(Flow::Continue)
    }

    async fn register(&mut self) -> Result<Flow> {
        let input = NewUser {
            first_name: or_cancel!(self.prompt.field("First Name").await?),
            last_name: or_cancel!(self.prompt.field("Last Name").await?),
            email: or_cancel!(self.prompt.field("Email").await?),
            username: or_cancel!(self.prompt.field("Username").await?),
            password: or_cancel!(self.prompt.secret("Password").await?),
        };

        let user = self.service.register(&input).await?;
        success(&format!(
            "Account '{}' created. You can now log in.",
            user.username
        ));
        Ok(Flow::Continue)
    }

    // ==================== 登录后 ====================

    async fn run_logged_in(&mut self, command: Command, session: &mut Session) -> Result<Flow> {
        match command {
            Command::Logout => return Ok(Flow::Logout),

            Command::Collections => {
                let list = self.service.list_collections(session).await?;
                print!("{}", render::collections(&list));
            }
            Command::NewCollection(name) => return self.new_collection(session, name).await,
            Command::RenameCollection(id) => return self.rename_collection(session, id).await,
            Command::DeleteCollection(id) => return self.delete_collection(session, id).await,
            Command::ShowCollection(id) => {
                let id = or_cancel!(self.prompt.number_or(id, "Collection ID").await?);
                let (collection, games) = self.service.collection_games(session, id).await?;
                println!("{}", render::heading(&collection.name));
                print!("{}", render::collection_games(&games));
            }
            Command::RemoveGame(collection_id, game_id) => {
                let collection_id =
                    or_cancel!(self.prompt.number_or(collection_id, "Collection ID").await?);
                let game_id = or_cancel!(self.prompt.number_or(game_id, "Game ID").await?);
                self.service
                    .remove_game_from_collection(session, collection_id, game_id)
                    .await?;
                success("Game removed from the collection.");
            }
            Command::PlayRandom(id) => return self.play_random(session, id).await,

            Command::Platforms => {
                let all = self.service.list_platforms().await?;
                let owned = self.service.my_platforms(session).await?;
                print!("{}", render::platforms(&all, &owned));
            }
            Command::Own(id) => {
                let id = or_cancel!(self.prompt.number_or(id, "Platform ID").await?);
                let platform = self.service.add_platform(session, id).await?;
                success(&format!("Added {} to your platforms.", platform.name));
            }
            Command::Disown(id) => {
                let id = or_cancel!(self.prompt.number_or(id, "Platform ID").await?);
                self.service.remove_platform(session, id).await?;
                success("Platform removed from your platforms.");
            }

            Command::Search => return self.search(session).await,
            Command::Results => match session.search_results() {
                Some(results) => print!("{}", render::search_results(results)),
                None => notice("No search results yet. Type 'search' first."),
            },
            Command::Sort(column) => return self.sort(session, column).await,
            Command::Add(row) => return self.add_to_collection(session, row).await,
            Command::Rate(row) => return self.rate(session, row).await,
            Command::Play(row) => return self.play(session, row).await,
            Command::History => {
                let records = self.service.play_history(session, HISTORY_LIMIT).await?;
                print!("{}", render::play_history(&records));
            }

            Command::Users(fragment) => {
                let fragment = match fragment {
                    Some(f) => f,
                    None => or_cancel!(self.prompt.field("Email contains").await?),
                };
                let users = self.service.search_users(session, &fragment).await?;
                print!("{}", render::user_matches(&users));
            }
            Command::Follow(id) => {
                let id = or_cancel!(self.prompt.number_or(id, "User ID").await?);
                let user = self.service.follow(session, id).await?;
                success(&format!("You are now following {}.", user.username));
            }
            Command::Unfollow(id) => return self.unfollow(session, id).await,
            Command::Following => {
                let list = self.service.following(session).await?;
                print!(
                    "{}",
                    render::follow_entries(&list, "You are not following anyone yet.")
                );
            }
            Command::Followers => {
                let list = self.service.followers(session).await?;
                print!(
                    "{}",
                    render::follow_entries(&list, "Nobody is following you yet.")
                );
            }
            Command::Activity => {
                let entries = self.service.following_activity(session, ACTIVITY_LIMIT).await?;
                print!("{}", render::activity(&entries));
            }

            Command::Profile => {
                let summary = self.service.profile(session).await?;
                print!("{}", render::profile(&summary));
            }
            Command::Top(mode) => {
                let mode: TopMode = mode
                    .as_deref()
                    .unwrap_or_default()
                    .parse()
                    .map_err(TrackerError::validation)?;
                let games = self.service.top_games(session, mode).await?;
                println!("{}", render::heading(&format!("Your top games by {}", mode)));
                print!("{}", render::top_games(&games, mode));
            }
            Command::Popular => {
                let games = self.service.popular_recent(session).await?;
                println!("{}", render::heading("Most played in the last 90 days"));
                print!("{}", render::popular(&games));
            }
            Command::PopularFollowed => {
                let games = self.service.popular_among_followed(session).await?;
                println!("{}", render::heading("Most played among people you follow"));
                print!("{}", render::popular(&games));
            }
            Command::NewReleases => {
                let games = self.service.new_releases(session).await?;
                println!("{}", render::heading("Top new releases this month"));
                print!("{}", render::new_releases(&games));
            }
            Command::Recommend => {
                let report = self.service.recommend(session).await?;
                println!("{}", render::heading("Recommended for you"));
                print!("{}", render::recommendations(&report));
            }

            // 登录前命令由 run_logged_out 处理
            _ => {}
        }
        Ok(Flow::Continue)
    }

    async fn new_collection(&mut self, session: &Session, name: Option<String>) -> Result<Flow> {
        let name = match name {
            Some(n) => n,
            None => or_cancel!(self.prompt.field("Collection name").await?),
        };
        let created = self.service.create_collection(session, &name).await?;
        success(&format!("Created collection '{}'.", created.name));
        Ok(Flow::Continue)
    }

    async fn rename_collection(&mut self, session: &Session, id: Option<i32>) -> Result<Flow> {
        let id = or_cancel!(self.prompt.number_or(id, "Collection ID").await?);
        let name = or_cancel!(self.prompt.field("New name").await?);
        let renamed = self.service.rename_collection(session, id, &name).await?;
        success(&format!("Collection renamed to '{}'.", renamed.name));
        Ok(Flow::Continue)
    }

    async fn delete_collection(&mut self, session: &Session, id: Option<i32>) -> Result<Flow> {
        let id = or_cancel!(self.prompt.number_or(id, "Collection ID").await?);
        let (collection, _) = self.service.collection_games(session, id).await?;
        let question = format!(
            "Are you sure you want to delete the collection '{}'? \
             Its games stay in the system.",
            collection.name
        );
        if !self.prompt.confirm(&question).await? {
            println!("Nothing deleted.");
            return Ok(Flow::Continue);
        }

        let deleted = self.service.delete_collection(session, id).await?;
        success(&format!("Deleted collection '{}'.", deleted.name));
        Ok(Flow::Continue)
    }

    async fn play_random(&mut self, session: &Session, id: Option<i32>) -> Result<Flow> {
        let id = or_cancel!(self.prompt.number_or(id, "Collection ID").await?);
        let (collection, games) = self.service.collection_games(session, id).await?;
        if games.is_empty() {
            return Err(TrackerError::EmptyCollection(collection.name));
        }

        let minutes = or_cancel!(self.prompt.number::<i32>("Minutes played").await?);
        let game = self.service.play_random(session, id, minutes).await?;
        success(&format!(
            "Picked '{}' from '{}' and logged {} minutes.",
            game.title, collection.name, minutes
        ));
        Ok(Flow::Continue)
    }

    // ==================== 搜索 ====================

    async fn search(&mut self, session: &mut Session) -> Result<Flow> {
        println!(
            "{}",
            "Leave a field empty to skip it.".if_supports_color(Stdout, |t| t.dimmed())
        );
        let input = SearchInput {
            title: or_cancel!(self.prompt.field("Title").await?),
            developer: or_cancel!(self.prompt.field("Developer").await?),
            publisher: or_cancel!(self.prompt.field("Publisher").await?),
            genre: or_cancel!(self.prompt.field("Genre").await?),
            platform: or_cancel!(self.prompt.field("Platform").await?),
            year: or_cancel!(self.prompt.field("Release Year").await?),
            max_price: or_cancel!(self.prompt.field("Max Price").await?),
        };

        let parsed = input.parse();
        for warning in &parsed.warnings {
            notice(warning);
        }

        let results = self.service.search(session, &parsed.filters).await?;
        print!("{}", render::search_results(&results));
        session.cache_search(results);
        Ok(Flow::Continue)
    }

    async fn sort(&mut self, session: &mut Session, column: Option<String>) -> Result<Flow> {
        if session.search_results().is_none() {
            notice("No search results yet. Type 'search' first.");
            return Ok(Flow::Continue);
        }
        let column = match column {
            Some(c) => c,
            None => {
                let names = SortColumn::ALL.map(|c| c.to_string()).join(", ");
                or_cancel!(self.prompt.field(&format!("Sort by ({})", names)).await?)
            }
        };
        let column: SortColumn = column.parse().map_err(TrackerError::validation)?;

        if let Some(results) = session.search_results_mut() {
            results.sort_by(column);
            print!("{}", render::search_results(results));
        }
        Ok(Flow::Continue)
    }

    /// 取搜索结果中的一行：游戏 ID 与标题
    async fn pick_row(
        &mut self,
        session: &Session,
        row: Option<usize>,
    ) -> Result<Option<(i32, String)>> {
        let Some(results) = session.search_results() else {
            notice("No search results yet. Type 'search' first.");
            return Ok(None);
        };
        let Some(number) = self.prompt.number_or(row, "Row number").await? else {
            return Ok(None);
        };
        match results.row(number) {
            Some(r) => Ok(Some((r.game_id, r.title.clone()))),
            None => Err(TrackerError::validation(format!(
                "There is no row {} in the results (1-{}).",
                number,
                results.len()
            ))),
        }
    }

    async fn add_to_collection(&mut self, session: &Session, row: Option<usize>) -> Result<Flow> {
        let (game_id, title) = or_cancel!(self.pick_row(session, row).await?);

        if self.service.check_platforms(session, game_id).await? == PlatformCheck::NotOwned {
            notice(&format!(
                "Warning: You do not own any of the platforms for '{}'.",
                title
            ));
            if !self
                .prompt
                .confirm("Do you still want to add it to a collection?")
                .await?
            {
                return Ok(Flow::Continue);
            }
        }

        let collections = self.service.list_collections(session).await?;
        if collections.is_empty() {
            notice("You have no collections. Please create one first.");
            return Ok(Flow::Continue);
        }
        print!("{}", render::collections(&collections));
        let collection_id = or_cancel!(self.prompt.number::<i32>("Collection ID").await?);

        let (collection, game) = self
            .service
            .add_game_to_collection(session, collection_id, game_id)
            .await?;
        success(&format!("Added '{}' to '{}'.", game.title, collection.name));
        Ok(Flow::Continue)
    }

    async fn rate(&mut self, session: &mut Session, row: Option<usize>) -> Result<Flow> {
        let (game_id, title) = or_cancel!(self.pick_row(session, row).await?);
        let stars = or_cancel!(
            self.prompt
                .number::<i32>(&format!("Rating for '{}' (1-5)", title))
                .await?
        );

        self.service.rate_game(session, game_id, stars).await?;
        if let Some(results) = session.search_results_mut() {
            results.update_game(game_id, |r| r.my_rating = Some(stars));
        }
        success(&format!("Rated '{}' {} stars.", title, stars));
        Ok(Flow::Continue)
    }

    async fn play(&mut self, session: &mut Session, row: Option<usize>) -> Result<Flow> {
        let (game_id, title) = or_cancel!(self.pick_row(session, row).await?);
        let minutes = or_cancel!(
            self.prompt
                .number::<i32>(&format!("Minutes played of '{}'", title))
                .await?
        );

        self.service.log_play(session, game_id, minutes).await?;
        if let Some(results) = session.search_results_mut() {
            results.update_game(game_id, |r| r.playtime += i64::from(minutes));
        }
        success(&format!("Logged {} minutes for '{}'.", minutes, title));
        Ok(Flow::Continue)
    }

    // ==================== 社交 ====================

    async fn unfollow(&mut self, session: &Session, id: Option<i32>) -> Result<Flow> {
        let id = or_cancel!(self.prompt.number_or(id, "User ID").await?);
        let following = self.service.following(session).await?;
        if let Some(entry) = following.iter().find(|e| e.user_id == id) {
            let question = format!("Are you sure you want to unfollow {}?", entry.username);
            if !self.prompt.confirm(&question).await? {
                return Ok(Flow::Continue);
            }
        }

        let user = self.service.unfollow(session, id).await?;
        success(&format!("You unfollowed {}.", user.username));
        Ok(Flow::Continue)
    }
}
