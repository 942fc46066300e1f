use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn as_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            "off" => Ok(LogLevel::Off),
            other => Err(format!(
                "Unknown log level '{}'. Use error, warn, info, debug, trace or off.",
                other
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
            LogLevel::Off => "off",
        };
        f.write_str(name)
    }
}

/// 初始化 env_logger，`RUST_LOG` 优先于命令行给出的默认级别
///
/// 日志器本身放行所有级别，由 `log::max_level` 决定输出，
/// 运行时的 `set_log_level` 因此可以调高也可以调低。
pub fn init_logging(default_level: LogLevel) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Trace)
        .format_timestamp_secs();

    let initial = match std::env::var("RUST_LOG") {
        Ok(spec) if !spec.trim().is_empty() => match spec.parse::<LogLevel>() {
            Ok(level) => level,
            // 带模块指令的写法交给 env_logger 过滤
            Err(_) => {
                builder.parse_filters(&spec);
                LogLevel::Trace
            }
        },
        _ => default_level,
    };

    let _ = builder.try_init();
    log::set_max_level(initial.as_filter());
}

/// 动态设置日志输出级别（不持久化）
pub fn set_log_level(level: &str) -> Result<LogLevel, String> {
    let parsed = level.parse::<LogLevel>()?;
    log::set_max_level(parsed.as_filter());
    Ok(parsed)
}

/// 获取当前日志级别
pub fn get_log_level() -> LogLevel {
    match log::max_level() {
        log::LevelFilter::Error => LogLevel::Error,
        log::LevelFilter::Warn => LogLevel::Warn,
        log::LevelFilter::Info => LogLevel::Info,
        log::LevelFilter::Debug => LogLevel::Debug,
        log::LevelFilter::Trace => LogLevel::Trace,
        log::LevelFilter::Off => LogLevel::Off,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" debug ".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for level in [LogLevel::Error, LogLevel::Info, LogLevel::Off] {
            assert_eq!(level.to_string().parse::<LogLevel>(), Ok(level));
        }
    }

    // 全局日志状态只在这一个测试里修改
    #[test]
    fn runtime_level_can_be_raised_and_lowered() {
        init_logging(LogLevel::Warn);
        let previous = log::max_level();

        assert_eq!(set_log_level("debug"), Ok(LogLevel::Debug));
        assert_eq!(get_log_level(), LogLevel::Debug);
        assert!(log::log_enabled!(log::Level::Debug));

        assert_eq!(set_log_level("error"), Ok(LogLevel::Error));
        assert_eq!(get_log_level(), LogLevel::Error);
        assert!(!log::log_enabled!(log::Level::Warn));

        assert!(set_log_level("nope").is_err());
        assert_eq!(get_log_level(), LogLevel::Error);
        log::set_max_level(previous);
    }
}
