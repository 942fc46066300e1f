//! SSH 端口转发
//!
//! 通过系统自带的 `ssh` 程序把本地空闲端口转发到数据库主机的端口，
//! 子进程在 [`SshTunnel`] 被丢弃时自动结束。

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::process::{Child, Command};
use tokio::time::{Instant, sleep};

use crate::error::{Result, TrackerError};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(15);
const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelSettings {
    pub host: String,
    pub ssh_port: u16,
    pub account: String,
    pub remote_port: u16,
}

impl TunnelSettings {
    /// 构造 ssh 参数列表
    pub fn ssh_args(&self, local_port: u16) -> Vec<String> {
        vec![
            "-N".to_string(),
            "-o".to_string(),
            "ExitOnForwardFailure=yes".to_string(),
            "-L".to_string(),
            format!("{}:127.0.0.1:{}", local_port, self.remote_port),
            "-p".to_string(),
            self.ssh_port.to_string(),
            format!("{}@{}", self.account, self.host),
        ]
    }
}

#[derive(Debug)]
pub struct SshTunnel {
    child: Child,
    local_port: u16,
}

impl SshTunnel {
    /// 启动隧道并等待本地端口可连接
    pub async fn open(settings: &TunnelSettings) -> Result<Self> {
        let local_port = pick_free_port().await?;
        let args = settings.ssh_args(local_port);
        log::info!(
            "启动 SSH 隧道: {}@{}:{} -> 本地端口 {}",
            settings.account,
            settings.host,
            settings.ssh_port,
            local_port
        );

        // stdin 继承终端，需要时 ssh 可以直接询问密码
        let child = Command::new("ssh")
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TrackerError::tunnel(format!("Could not start ssh: {}", e)))?;

        let mut tunnel = Self { child, local_port };
        tunnel.wait_until_ready().await?;
        log::info!("SSH 隧道已就绪，本地端口 {}", local_port);
        Ok(tunnel)
    }

    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    async fn wait_until_ready(&mut self) -> Result<()> {
        let deadline = Instant::now() + STARTUP_TIMEOUT;
        loop {
            if let Some(status) = self.child.try_wait()? {
                let stderr = self.read_stderr().await;
                return Err(TrackerError::tunnel(format!(
                    "ssh exited with {}: {}",
                    status,
                    stderr.trim()
                )));
            }

            if TcpStream::connect(("127.0.0.1", self.local_port))
                .await
                .is_ok()
            {
                return Ok(());
            }

            if Instant::now() >= deadline {
                let _ = self.child.kill().await;
                return Err(TrackerError::tunnel(format!(
                    "Port {} did not open within {} seconds",
                    self.local_port,
                    STARTUP_TIMEOUT.as_secs()
                )));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn read_stderr(&mut self) -> String {
        let mut buf = String::new();
        if let Some(mut stderr) = self.child.stderr.take() {
            let _ = stderr.read_to_string(&mut buf).await;
        }
        buf
    }

    /// 关闭隧道
    pub async fn close(mut self) {
        match self.child.kill().await {
            Ok(()) => log::info!("SSH 隧道已关闭"),
            Err(e) => log::warn!("关闭 SSH 隧道失败: {}", e),
        }
    }
}

/// 绑定 0 端口让系统分配一个空闲端口，随后立即释放
async fn pick_free_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
    let port = listener.local_addr()?.port();
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssh_args_forward_local_port_to_remote() {
        let settings = TunnelSettings {
            host: "db.example.edu".to_string(),
            ssh_port: 2222,
            account: "alice".to_string(),
            remote_port: 5432,
        };
        let args = settings.ssh_args(40000);
        assert_eq!(args[0], "-N");
        assert!(args.contains(&"40000:127.0.0.1:5432".to_string()));
        assert!(args.contains(&"2222".to_string()));
        assert_eq!(args.last().unwrap(), "alice@db.example.edu");
    }

    #[tokio::test]
    async fn free_port_is_nonzero() {
        assert_ne!(pick_free_port().await.unwrap(), 0);
    }
}
