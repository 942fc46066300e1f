//! 文本表格与各视图的渲染

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::database::dto::{
    ActivityEntry, CollectionSummary, FollowEntry, GameBrief, NewRelease, PlayRecord, PopularGame,
    ProfileSummary, RecommendationReport, UserMatch,
};
use crate::entity::platform;
use crate::ranking::{RankedGame, TopMode};
use crate::search::SearchResults;
use crate::utils::format::{
    format_average, format_duration, format_price, format_rating, format_timestamp, format_year,
    or_na, truncate,
};

/// 单元格最大宽度
const MAX_CELL_WIDTH: usize = 32;

/// 左对齐的纯文本表格
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) -> &mut Self {
        self.rows
            .push(cells.iter().map(|c| truncate(c, MAX_CELL_WIDTH)).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| {
                    let pad = w.saturating_sub(cell.chars().count());
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&line(&self.headers));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&line(&rule));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        out
    }
}

pub fn heading(text: &str) -> String {
    format!("{}", text.if_supports_color(Stdout, |t| t.bold()))
}

fn empty_or(table: &Table, empty: &str) -> String {
    if table.is_empty() {
        format!("{}\n", empty)
    } else {
        table.render()
    }
}

pub fn collections(list: &[CollectionSummary]) -> String {
    let mut table = Table::new(["ID", "Name", "Games", "Play Time"]);
    for c in list {
        table.row(vec![
            c.collection_id.to_string(),
            c.name.clone(),
            c.game_count.to_string(),
            format_duration(Some(c.total_minutes)),
        ]);
    }
    empty_or(&table, "You have no collections yet. Use 'new-collection' to create one.")
}

pub fn collection_games(games: &[GameBrief]) -> String {
    let mut table = Table::new(["Game ID", "Title", "Age Rating"]);
    for g in games {
        table.row(vec![
            g.game_id.to_string(),
            g.title.clone(),
            or_na(g.esrb_rating.as_deref()).to_string(),
        ]);
    }
    empty_or(&table, "This collection has no games in it.")
}

/// 平台列表，标记用户拥有的平台
pub fn platforms(all: &[platform::Model], owned: &[platform::Model]) -> String {
    let mut table = Table::new(["ID", "Platform", "Owned"]);
    for p in all {
        let mine = owned.iter().any(|o| o.id == p.id);
        table.row(vec![
            p.id.to_string(),
            p.name.clone(),
            if mine { "yes" } else { "" }.to_string(),
        ]);
    }
    empty_or(&table, "No platforms found.")
}

pub fn search_results(results: &SearchResults) -> String {
    let mut table = Table::new([
        "#",
        "Title",
        "Year",
        "Price",
        "Platforms",
        "Developers",
        "Publishers",
        "Play Time",
        "Age",
        "My Rating",
    ]);
    for (i, r) in results.rows().iter().enumerate() {
        table.row(vec![
            (i + 1).to_string(),
            r.title.clone(),
            format_year(r.release_year),
            format_price(r.min_price),
            or_na(r.platforms.as_deref()).to_string(),
            or_na(r.developers.as_deref()).to_string(),
            or_na(r.publishers.as_deref()).to_string(),
            format_duration(Some(r.playtime)),
            or_na(r.esrb_rating.as_deref()).to_string(),
            format_rating(r.my_rating),
        ]);
    }
    if table.is_empty() {
        return "No games found matching your criteria.\n".to_string();
    }
    let mut out = table.render();
    out.push_str(&format!("{} game(s) found.", results.len()));
    if let Some((column, direction)) = results.sorted_by() {
        out.push_str(&format!(" Sorted by {} ({}).", column, direction));
    }
    out.push('\n');
    out
}

pub fn play_history(records: &[PlayRecord]) -> String {
    let mut table = Table::new(["When", "Game ID", "Title", "Duration"]);
    for r in records {
        table.row(vec![
            format_timestamp(&r.played_at),
            r.game_id.to_string(),
            r.title.clone(),
            format_duration(Some(i64::from(r.duration))),
        ]);
    }
    empty_or(&table, "You have not logged any play sessions yet.")
}

pub fn user_matches(users: &[UserMatch]) -> String {
    let mut table = Table::new(["User ID", "Username", "Email"]);
    for u in users {
        table.row(vec![u.user_id.to_string(), u.username.clone(), u.email.clone()]);
    }
    empty_or(&table, "No users found.")
}

pub fn follow_entries(entries: &[FollowEntry], empty: &str) -> String {
    let mut table = Table::new(["User ID", "Username", "Email", "Since"]);
    for e in entries {
        table.row(vec![
            e.user_id.to_string(),
            e.username.clone(),
            e.email.clone(),
            format_timestamp(&e.follow_date),
        ]);
    }
    empty_or(&table, empty)
}

pub fn activity(entries: &[ActivityEntry]) -> String {
    let mut table = Table::new(["When", "User", "Game", "Duration"]);
    for e in entries {
        table.row(vec![
            format_timestamp(&e.played_at),
            e.username.clone(),
            e.title.clone(),
            format_duration(Some(i64::from(e.duration))),
        ]);
    }
    empty_or(&table, "No recent activity from the people you follow.")
}

pub fn profile(summary: &ProfileSummary) -> String {
    format!(
        "{}\n  Name:        {} {}\n  Collections: {}\n  Followers:   {}\n  Following:   {}\n",
        heading(&summary.username),
        summary.first_name,
        summary.last_name,
        summary.collections,
        summary.followers,
        summary.following,
    )
}

pub fn top_games(games: &[RankedGame], mode: TopMode) -> String {
    let mut table = Table::new(["#", "Title", "My Rating", "Play Time"]);
    for (i, g) in games.iter().enumerate() {
        table.row(vec![
            (i + 1).to_string(),
            g.title.clone(),
            format_rating(g.rating),
            format_duration(Some(g.playtime)),
        ]);
    }
    let empty = match mode {
        TopMode::Rating => "You have not rated any games yet.",
        TopMode::Playtime => "You have not played any games yet.",
        TopMode::Combined => "No games have both a rating and play time yet.",
    };
    empty_or(&table, empty)
}

pub fn popular(games: &[PopularGame]) -> String {
    let mut table = Table::new(["#", "Title", "Total Play Time", "Players"]);
    for (i, g) in games.iter().enumerate() {
        table.row(vec![
            (i + 1).to_string(),
            g.title.clone(),
            format_duration(Some(g.total_minutes)),
            g.players.to_string(),
        ]);
    }
    empty_or(&table, "No play sessions found.")
}

pub fn new_releases(games: &[NewRelease]) -> String {
    let mut table = Table::new(["#", "Title", "Released", "Total Play Time"]);
    for (i, g) in games.iter().enumerate() {
        table.row(vec![
            (i + 1).to_string(),
            g.title.clone(),
            g.release_date.format("%Y-%m-%d").to_string(),
            format_duration(Some(g.total_minutes)),
        ]);
    }
    empty_or(&table, "No games were released this month.")
}

pub fn recommendations(report: &RecommendationReport) -> String {
    let mut out = String::new();
    if !report.top_genres.is_empty() {
        out.push_str(&format!("Your top genres: {}\n", report.top_genres.join(", ")));
    }
    if !report.top_developers.is_empty() {
        out.push_str(&format!(
            "Your top developers: {}\n",
            report.top_developers.join(", ")
        ));
    }
    if report.items.iter().any(|r| r.fallback) {
        out.push_str("Nothing matched your tastes yet, so here are some highly rated games.\n");
    }

    let mut table = Table::new(["#", "Game ID", "Title", "Score", "Avg Rating"]);
    for (i, r) in report.items.iter().enumerate() {
        table.row(vec![
            (i + 1).to_string(),
            r.game_id.to_string(),
            r.title.clone(),
            r.score.to_string(),
            format_average(r.avg_rating),
        ]);
    }
    out.push_str(&empty_or(&table, "No recommendations available right now."));
    out
}
