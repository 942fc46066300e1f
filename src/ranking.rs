//! 排行与推荐打分

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::database::dto::{CandidateGame, LibraryGameStat, Recommendation};

pub const TOP_GAMES_LIMIT: usize = 10;
pub const RECOMMENDATION_LIMIT: usize = 10;
/// 参与推荐的偏好类型/开发商个数
pub const TOP_TASTES: u64 = 3;
pub const GENRE_MATCH_POINTS: i32 = 3;
pub const DEVELOPER_MATCH_POINTS: i32 = 3;
/// 兜底推荐的最低平均评分
pub const FALLBACK_MIN_AVERAGE: f64 = 4.0;

/// “我的最佳游戏”排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopMode {
    #[default]
    Rating,
    Playtime,
    /// 评分 × 游玩时长
    Combined,
}

impl FromStr for TopMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "rating" => Ok(TopMode::Rating),
            "playtime" => Ok(TopMode::Playtime),
            "combined" | "both" => Ok(TopMode::Combined),
            other => Err(format!(
                "Unknown mode '{}'. Use rating, playtime or combined.",
                other
            )),
        }
    }
}

impl fmt::Display for TopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TopMode::Rating => "rating",
            TopMode::Playtime => "playtime",
            TopMode::Combined => "combined",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedGame {
    pub game_id: i32,
    pub title: String,
    pub rating: Option<i32>,
    pub playtime: i64,
    pub score: f64,
}

fn score_for(stat: &LibraryGameStat, mode: TopMode) -> Option<f64> {
    match mode {
        TopMode::Rating => stat.rating.map(f64::from),
        TopMode::Playtime => (stat.playtime > 0).then_some(stat.playtime as f64),
        TopMode::Combined => stat
            .rating
            .map(|r| f64::from(r) * stat.playtime as f64)
            .filter(|s| *s > 0.0),
    }
}

/// 按所选方式为用户库中的游戏打分，取前十
///
/// 没有对应数据（未评分、未游玩）的游戏不参与排行。
pub fn rank_top_games(stats: Vec<LibraryGameStat>, mode: TopMode) -> Vec<RankedGame> {
    let mut ranked: Vec<RankedGame> = stats
        .into_iter()
        .filter_map(|stat| {
            let score = score_for(&stat, mode)?;
            Some(RankedGame {
                game_id: stat.game_id,
                title: stat.title,
                rating: stat.rating,
                playtime: stat.playtime,
                score,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| compare_titles(&a.title, &b.title))
    });
    ranked.truncate(TOP_GAMES_LIMIT);
    ranked
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// 平均评分降序，没有评分的排在最后
fn compare_average(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn by_recommendation_order(a: &Recommendation, b: &Recommendation) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| compare_average(a.avg_rating, b.avg_rating))
        .then_with(|| compare_titles(&a.title, &b.title))
}

/// 为候选游戏打分：命中偏好类型 +3，命中偏好开发商 +3
pub fn score_candidates(candidates: Vec<CandidateGame>) -> Vec<Recommendation> {
    let mut scored: Vec<Recommendation> = candidates
        .into_iter()
        .filter_map(|c| {
            let mut score = 0;
            if c.genre_hit > 0 {
                score += GENRE_MATCH_POINTS;
            }
            if c.developer_hit > 0 {
                score += DEVELOPER_MATCH_POINTS;
            }
            (score > 0).then(|| Recommendation {
                game_id: c.game_id,
                title: c.title,
                score,
                avg_rating: c.avg_rating,
                fallback: false,
            })
        })
        .collect();

    scored.sort_by(by_recommendation_order);
    scored.truncate(RECOMMENDATION_LIMIT);
    scored
}

/// 兜底列表：全局高评分游戏
pub fn fallback_recommendations(candidates: Vec<CandidateGame>) -> Vec<Recommendation> {
    let mut list: Vec<Recommendation> = candidates
        .into_iter()
        .filter(|c| c.avg_rating.is_some_and(|avg| avg >= FALLBACK_MIN_AVERAGE))
        .map(|c| Recommendation {
            game_id: c.game_id,
            title: c.title,
            score: 0,
            avg_rating: c.avg_rating,
            fallback: true,
        })
        .collect();

    list.sort_by(by_recommendation_order);
    list.truncate(RECOMMENDATION_LIMIT);
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(id: i32, title: &str, rating: Option<i32>, playtime: i64) -> LibraryGameStat {
        LibraryGameStat {
            game_id: id,
            title: title.to_string(),
            rating,
            playtime,
        }
    }

    fn candidate(id: i32, title: &str, genre: bool, dev: bool, avg: Option<f64>) -> CandidateGame {
        CandidateGame {
            game_id: id,
            title: title.to_string(),
            genre_hit: i64::from(genre),
            developer_hit: i64::from(dev),
            avg_rating: avg,
        }
    }

    fn ids<T>(items: &[T], id: impl Fn(&T) -> i32) -> Vec<i32> {
        items.iter().map(id).collect()
    }

    #[test]
    fn rating_mode_skips_unrated_and_breaks_ties_by_title() {
        let ranked = rank_top_games(
            vec![
                stat(1, "Beta", Some(5), 0),
                stat(2, "alpha", Some(5), 10),
                stat(3, "Gamma", None, 900),
                stat(4, "Delta", Some(2), 30),
            ],
            TopMode::Rating,
        );
        assert_eq!(ids(&ranked, |g| g.game_id), vec![2, 1, 4]);
    }

    #[test]
    fn playtime_mode_skips_unplayed() {
        let ranked = rank_top_games(
            vec![stat(1, "A", Some(5), 0), stat(2, "B", None, 45), stat(3, "C", None, 90)],
            TopMode::Playtime,
        );
        assert_eq!(ids(&ranked, |g| g.game_id), vec![3, 2]);
    }

    #[test]
    fn combined_mode_multiplies_rating_and_playtime() {
        let ranked = rank_top_games(
            vec![
                stat(1, "A", Some(2), 100),
                stat(2, "B", Some(5), 30),
                stat(3, "C", Some(5), 0),
                stat(4, "D", None, 500),
            ],
            TopMode::Combined,
        );
        assert_eq!(ids(&ranked, |g| g.game_id), vec![1, 2]);
        assert_eq!(ranked[0].score, 200.0);
    }

    #[test]
    fn top_games_are_capped_at_ten() {
        let stats = (0..15).map(|i| stat(i, &format!("G{i:02}"), Some(3), 10)).collect();
        assert_eq!(rank_top_games(stats, TopMode::Rating).len(), TOP_GAMES_LIMIT);
    }

    #[test]
    fn candidates_score_three_per_match() {
        let recs = score_candidates(vec![
            candidate(1, "Genre only", true, false, Some(5.0)),
            candidate(2, "Both", true, true, None),
            candidate(3, "Dev only", false, true, Some(3.0)),
            candidate(4, "Neither", false, false, Some(5.0)),
        ]);
        assert_eq!(ids(&recs, |r| r.game_id), vec![2, 1, 3]);
        assert_eq!(recs[0].score, 6);
        assert_eq!(recs[1].score, 3);
    }

    #[test]
    fn equal_scores_break_ties_by_average_then_title() {
        let recs = score_candidates(vec![
            candidate(1, "Zeta", true, false, Some(4.5)),
            candidate(2, "Alpha", true, false, None),
            candidate(3, "Beta", true, false, Some(4.5)),
            candidate(4, "Gamma", true, false, Some(2.0)),
        ]);
        assert_eq!(ids(&recs, |r| r.game_id), vec![3, 1, 4, 2]);
    }

    #[test]
    fn fallback_keeps_only_highly_rated() {
        let recs = fallback_recommendations(vec![
            candidate(1, "Good", false, false, Some(4.0)),
            candidate(2, "Great", false, false, Some(4.8)),
            candidate(3, "Meh", false, false, Some(3.9)),
            candidate(4, "Unrated", false, false, None),
        ]);
        assert_eq!(ids(&recs, |r| r.game_id), vec![2, 1]);
        assert!(recs.iter().all(|r| r.fallback));
    }

    #[test]
    fn modes_parse() {
        assert_eq!("".parse::<TopMode>(), Ok(TopMode::Rating));
        assert_eq!("Playtime".parse::<TopMode>(), Ok(TopMode::Playtime));
        assert_eq!("combined".parse::<TopMode>(), Ok(TopMode::Combined));
        assert!("loudness".parse::<TopMode>().is_err());
    }
}
