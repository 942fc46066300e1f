//! 命令行解析
//!
//! 每行输入由命令名和可选参数组成，缺少的参数在执行时再交互询问。

/// 登录前后可用的所有命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Help,
    Quit,
    Login,
    Register,
    Logout,
    LogLevel(Option<String>),

    // 合集
    Collections,
    NewCollection(Option<String>),
    RenameCollection(Option<i32>),
    DeleteCollection(Option<i32>),
    ShowCollection(Option<i32>),
    RemoveGame(Option<i32>, Option<i32>),
    PlayRandom(Option<i32>),

    // 平台
    Platforms,
    Own(Option<i32>),
    Disown(Option<i32>),

    // 搜索与结果行操作
    Search,
    Results,
    Sort(Option<String>),
    Add(Option<usize>),
    Rate(Option<usize>),
    Play(Option<usize>),
    History,

    // 社交
    Users(Option<String>),
    Follow(Option<i32>),
    Unfollow(Option<i32>),
    Following,
    Followers,
    Activity,

    // 个人资料与榜单
    Profile,
    Top(Option<String>),
    Popular,
    PopularFollowed,
    NewReleases,
    Recommend,
}

impl Command {
    /// 是否需要先登录
    pub fn requires_session(&self) -> bool {
        !matches!(
            self,
            Command::Empty
                | Command::Help
                | Command::Quit
                | Command::Login
                | Command::Register
                | Command::LogLevel(_)
        )
    }

    pub fn parse(line: &str) -> Result<Command, String> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Ok(Command::Empty);
        };
        let args: Vec<&str> = parts.collect();
        let rest = || (!args.is_empty()).then(|| args.join(" "));

        let command = match name.to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "login" => Command::Login,
            "register" => Command::Register,
            "logout" => Command::Logout,
            "loglevel" => Command::LogLevel(rest()),

            "collections" => Command::Collections,
            "new-collection" => Command::NewCollection(rest()),
            "rename-collection" => Command::RenameCollection(number(&args, 0, "collection id")?),
            "delete-collection" => Command::DeleteCollection(number(&args, 0, "collection id")?),
            "show-collection" => Command::ShowCollection(number(&args, 0, "collection id")?),
            "remove-game" => Command::RemoveGame(
                number(&args, 0, "collection id")?,
                number(&args, 1, "game id")?,
            ),
            "play-random" => Command::PlayRandom(number(&args, 0, "collection id")?),

            "platforms" => Command::Platforms,
            "own" => Command::Own(number(&args, 0, "platform id")?),
            "disown" => Command::Disown(number(&args, 0, "platform id")?),

            "search" => Command::Search,
            "results" => Command::Results,
            "sort" => Command::Sort(rest()),
            "add" => Command::Add(number(&args, 0, "row number")?),
            "rate" => Command::Rate(number(&args, 0, "row number")?),
            "play" => Command::Play(number(&args, 0, "row number")?),
            "history" => Command::History,

            "users" => Command::Users(rest()),
            "follow" => Command::Follow(number(&args, 0, "user id")?),
            "unfollow" => Command::Unfollow(number(&args, 0, "user id")?),
            "following" => Command::Following,
            "followers" => Command::Followers,
            "activity" => Command::Activity,

            "profile" => Command::Profile,
            "top" => Command::Top(rest()),
            "popular" => Command::Popular,
            "popular-followed" => Command::PopularFollowed,
            "new-releases" => Command::NewReleases,
            "recommend" => Command::Recommend,

            other => {
                return Err(format!(
                    "Unknown command '{}'. Type 'help' for a list of commands.",
                    other
                ));
            }
        };
        Ok(command)
    }
}

fn number<T: std::str::FromStr>(args: &[&str], index: usize, what: &str) -> Result<Option<T>, String> {
    match args.get(index) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("Expected a number for {}, got '{}'.", what, raw)),
    }
}

pub const LOGGED_OUT_HELP: &[(&str, &str)] = &[
    ("login", "Log in to your account"),
    ("register", "Create a new account"),
    ("loglevel [level]", "Show or change the log level"),
    ("help", "Show this help"),
    ("quit", "Exit the program"),
];

pub const LOGGED_IN_HELP: &[(&str, &str)] = &[
    ("collections", "List your collections"),
    ("new-collection [name]", "Create a collection"),
    ("rename-collection <id>", "Rename a collection"),
    ("delete-collection <id>", "Delete a collection"),
    ("show-collection <id>", "List the games in a collection"),
    ("remove-game <id> <game>", "Remove a game from a collection"),
    ("play-random <id>", "Log a session for a random game of a collection"),
    ("platforms", "List platforms and the ones you own"),
    ("own <id> / disown <id>", "Add or remove an owned platform"),
    ("search", "Search games"),
    ("results", "Show the last search results"),
    ("sort <column>", "Sort the results (repeat to reverse)"),
    ("add <row>", "Add a result to one of your collections"),
    ("rate <row>", "Rate a result from 1 to 5"),
    ("play <row>", "Log a play session for a result"),
    ("history", "Your latest play sessions"),
    ("users [email]", "Find users by email"),
    ("follow <id> / unfollow <id>", "Follow or unfollow a user"),
    ("following / followers", "List who you follow or who follows you"),
    ("activity", "Latest sessions of the people you follow"),
    ("profile", "Your profile"),
    ("top [rating|playtime|combined]", "Your top 10 games"),
    ("popular", "Most played games of the last 90 days"),
    ("popular-followed", "Most played games among people you follow"),
    ("new-releases", "Top games released this month"),
    ("recommend", "Games picked for you"),
    ("loglevel [level]", "Show or change the log level"),
    ("logout", "Log out"),
    ("quit", "Exit the program"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_empty_commands() {
        assert_eq!(Command::parse("   "), Ok(Command::Empty));
    }

    #[test]
    fn numeric_arguments_are_parsed() {
        assert_eq!(Command::parse("remove-game 3 14"), Ok(Command::RemoveGame(Some(3), Some(14))));
        assert_eq!(Command::parse("play-random"), Ok(Command::PlayRandom(None)));
        assert_eq!(Command::parse("RATE 2"), Ok(Command::Rate(Some(2))));
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = Command::parse("follow bob").unwrap_err();
        assert_eq!(err, "Expected a number for user id, got 'bob'.");
    }

    #[test]
    fn free_text_arguments_keep_spaces() {
        assert_eq!(
            Command::parse("new-collection Couch  Co-op"),
            Ok(Command::NewCollection(Some("Couch Co-op".to_string())))
        );
        assert_eq!(Command::parse("top"), Ok(Command::Top(None)));
    }

    #[test]
    fn unknown_commands_are_errors() {
        assert!(Command::parse("dance").is_err());
    }

    #[test]
    fn session_gating() {
        assert!(!Command::Login.requires_session());
        assert!(!Command::Register.requires_session());
        assert!(Command::Collections.requires_session());
        assert!(Command::Search.requires_session());
        assert!(Command::Logout.requires_session());
    }
}
