//! 终端展示用的格式化函数

use chrono::NaiveDateTime;

/// 分钟数显示为 `HH:MM`，无记录时为 `00:00`
pub fn format_duration(minutes: Option<i64>) -> String {
    let total = minutes.unwrap_or(0).max(0);
    format!("{:02}:{:02}", total / 60, total % 60)
}

pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${:.2}", p),
        None => "N/A".to_string(),
    }
}

pub fn format_rating(rating: Option<i32>) -> String {
    match rating {
        Some(r) => format!("{} ★", r),
        None => "N/A".to_string(),
    }
}

pub fn format_average(avg: Option<f64>) -> String {
    match avg {
        Some(a) => format!("{:.2}", a),
        None => "N/A".to_string(),
    }
}

pub fn format_year(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "N/A".to_string())
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

pub fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "N/A",
    }
}

/// 截断过长的单元格内容
pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let keep = width.saturating_sub(1);
    let mut out: String = value.chars().take(keep).collect();
    out.push('…');
    out
}
