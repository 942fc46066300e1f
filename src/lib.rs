pub mod cli;
pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod ranking;
pub mod search;
pub mod session;
pub mod shell;
pub mod utils;

use std::io::IsTerminal;

use cli::Cli;
use config::TrackerConfig;
use database::TrackerService;
use database::db::{self, DatabaseTarget};
use error::{Result, TrackerError};
use shell::Shell;
use utils::tunnel::{SshTunnel, TunnelSettings};

/// 根据命令行选择数据库；需要隧道时一并返回隧道句柄
async fn open_target(cli: &Cli) -> Result<(DatabaseTarget, Option<SshTunnel>)> {
    if let Some(url) = &cli.database_url {
        log::info!("使用指定的数据库连接串");
        return Ok((DatabaseTarget::Url(url.clone()), None));
    }

    if cli.local {
        let path = tracker_path::get_db_path().map_err(TrackerError::config)?;
        return Ok((DatabaseTarget::LocalFile(path), None));
    }

    let cwd = std::env::current_dir()?;
    let config_path = tracker_path::resolve_config_path(cli.config.as_deref(), &cwd)
        .map_err(TrackerError::config)?;
    let config = TrackerConfig::load(&config_path)?;

    let settings = TunnelSettings {
        host: cli.ssh_host.clone(),
        ssh_port: cli.ssh_port,
        account: config.account.clone(),
        remote_port: cli.remote_port,
    };
    let tunnel = SshTunnel::open(&settings).await?;
    let target = DatabaseTarget::Tunnelled {
        local_port: tunnel.local_port(),
        config,
    };
    Ok((target, Some(tunnel)))
}

/// 连接目标的日志描述，不含密钥
fn describe(target: &DatabaseTarget) -> String {
    match target {
        DatabaseTarget::Url(_) => "the given database URL".to_string(),
        DatabaseTarget::LocalFile(path) => path.display().to_string(),
        DatabaseTarget::Tunnelled { local_port, config } => {
            format!("{} through 127.0.0.1:{}", config.database, local_port)
        }
    }
}

/// 启动：连接数据库、执行迁移、运行交互终端，退出时关闭连接与隧道
pub async fn run(cli: Cli) -> Result<()> {
    let (target, tunnel) = open_target(&cli).await?;
    log::info!("连接数据库: {}", describe(&target));

    let result = async {
        let conn = db::establish_connection(&target).await?;
        log::info!("数据库连接建立成功");

        if cli.migrate || target.is_sqlite() {
            log::info!("开始执行数据库迁移...");
            db::run_migrations(&conn).await?;
        }

        let mut shell = Shell::new(
            TrackerService::new(conn),
            tokio::io::BufReader::new(tokio::io::stdin()),
        );
        if std::io::stdin().is_terminal() {
            shell = shell.hide_passwords();
        }
        let outcome = shell.run().await;

        match db::close_connection(shell.into_service().into_connection()).await {
            Ok(_) => log::info!("数据库连接已关闭"),
            Err(e) => log::error!("关闭数据库连接时出错: {}", e),
        }
        outcome
    }
    .await;

    if let Some(tunnel) = tunnel {
        tunnel.close().await;
    }
    result
}
