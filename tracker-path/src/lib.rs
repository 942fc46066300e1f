use std::path::{Path, PathBuf};

/// 路径相关常量
pub const CONFIG_FILE_NAME: &str = "config.txt";
pub const DB_DATA_DIR: &str = "data";
pub const DB_FILE_NAME: &str = "game_tracker.db";

/// 获取系统数据目录（跨平台）
pub fn get_base_data_dir() -> Result<PathBuf, String> {
    use directories::ProjectDirs;

    let dirs = ProjectDirs::from("dev", "gametracker", "game-tracker")
        .ok_or_else(|| "无法获取系统目录信息".to_string())?;
    Ok(dirs.data_dir().to_path_buf())
}

/// 获取本地 SQLite 数据库文件路径
pub fn get_db_path() -> Result<PathBuf, String> {
    Ok(get_base_data_dir()?.join(DB_DATA_DIR).join(DB_FILE_NAME))
}

/// 在数据目录中查找配置文件的默认位置
pub fn get_default_config_path() -> Result<PathBuf, String> {
    Ok(get_base_data_dir()?.join(CONFIG_FILE_NAME))
}

/// 解析配置文件路径
///
/// 查找顺序：
/// 1. 显式指定的路径
/// 2. 工作目录下的 `config.txt`
/// 3. 数据目录下的 `config.txt`
///
/// 显式路径总是被返回（即使文件不存在），以便调用方报告准确的错误。
pub fn resolve_config_path(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf, String> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let local = cwd.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Ok(local);
    }

    let fallback = get_default_config_path()?;
    if fallback.exists() {
        Ok(fallback)
    } else {
        // 都不存在时返回工作目录下的路径，错误信息更直观
        Ok(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let cwd = std::env::temp_dir();
        let explicit = PathBuf::from("/nonexistent/custom.txt");
        let resolved = resolve_config_path(Some(&explicit), &cwd).unwrap();
        assert_eq!(resolved, explicit);
    }

    #[test]
    fn falls_back_to_working_directory_name() {
        let cwd = PathBuf::from("/nonexistent-working-dir");
        if let Ok(resolved) = resolve_config_path(None, &cwd) {
            assert_eq!(resolved.file_name().unwrap(), CONFIG_FILE_NAME);
        }
    }

    #[test]
    fn db_path_ends_with_file_name() {
        if let Ok(path) = get_db_path() {
            assert!(path.ends_with(Path::new(DB_DATA_DIR).join(DB_FILE_NAME)));
        }
    }
}
