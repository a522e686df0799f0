//! Node Service that runs Bee as a child process.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

use sm_core::ports::{NodeServicePort, RunningNodePort};
use sm_core::{IdentityAddress, NodeMode, NodeStartDescriptor, SecretString};

use super::api::BeeApiClient;
use super::args::start_args;
use super::keystore::read_keystore_address;

const PASSWORD_ENV: &str = "BEE_PASSWORD";

#[derive(Debug, Clone)]
pub struct BeeServiceOptions {
    pub bee_binary: PathBuf,
    pub api_url: String,
    /// How long a fresh node gets to answer `/health`.
    pub startup_timeout: Duration,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for BeeServiceOptions {
    fn default() -> Self {
        Self {
            bee_binary: PathBuf::from("bee"),
            api_url: "http://127.0.0.1:1633".to_string(),
            startup_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_millis(500),
            request_timeout: Duration::from_secs(10),
        }
    }
}

pub struct BeeNodeService {
    options: BeeServiceOptions,
}

impl BeeNodeService {
    pub fn new(options: BeeServiceOptions) -> Self {
        Self { options }
    }

    fn spawn(
        &self,
        descriptor: &NodeStartDescriptor,
        password: &SecretString,
        api_addr: &str,
    ) -> Result<Child> {
        let mut child = Command::new(&self.options.bee_binary)
            .args(start_args(descriptor, api_addr))
            .env(PASSWORD_ENV, password.expose())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| {
                format!(
                    "failed to launch node binary {}",
                    self.options.bee_binary.display()
                )
            })?;

        if let Some(stdout) = child.stdout.take() {
            forward_lines("stdout", stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines("stderr", stderr);
        }
        Ok(child)
    }

    async fn wait_until_healthy(&self, child: &mut Child, api: &BeeApiClient) -> Result<()> {
        let deadline = Instant::now() + self.options.startup_timeout;
        loop {
            if let Some(status) = child.try_wait().context("failed to poll node process")? {
                bail!("node exited before becoming ready ({status})");
            }
            if api.is_healthy().await {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!(
                    "node did not become ready within {}s",
                    self.options.startup_timeout.as_secs()
                );
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    async fn launch(
        &self,
        descriptor: &NodeStartDescriptor,
        password: &SecretString,
    ) -> Result<BeeRunningNode> {
        let api = BeeApiClient::new(&self.options.api_url, self.options.request_timeout)?;
        let api_addr = listen_addr(api.base_url())?;

        tokio::fs::create_dir_all(&descriptor.data_dir)
            .await
            .with_context(|| {
                format!("create data dir failed: {}", descriptor.data_dir.display())
            })?;

        let mut child = self.spawn(descriptor, password, &api_addr)?;
        info!(pid = ?child.id(), %api_addr, "node process spawned");

        let ready = async {
            self.wait_until_healthy(&mut child, &api).await?;
            let info = api.node_info().await?;
            let address = api.identity_address().await?;
            Ok::<_, anyhow::Error>((info, address))
        }
        .await;

        match ready {
            Ok((info, identity_address)) => {
                info!(bee_mode = %info.bee_mode, %identity_address, "node ready");
                Ok(BeeRunningNode {
                    api,
                    child: Mutex::new(Some(child)),
                    mode: info.mode,
                    identity_address,
                })
            }
            Err(e) => {
                stop_child(&mut child).await;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl NodeServicePort for BeeNodeService {
    async fn start_node(
        &self,
        descriptor: &NodeStartDescriptor,
        password: &SecretString,
    ) -> Result<Arc<dyn RunningNodePort>> {
        let span = info_span!(
            "bee.start_node",
            data_dir = %descriptor.data_dir.display(),
            swap_enable = descriptor.swap_enable,
        );
        let node = self.launch(descriptor, password).instrument(span).await?;
        Ok(Arc::new(node))
    }

    async fn recover_identity_address(
        &self,
        storage_path: &Path,
        password: &SecretString,
    ) -> Result<IdentityAddress> {
        let storage_path = storage_path.to_path_buf();
        let password = password.duplicate();
        let address = tokio::task::spawn_blocking(move || {
            read_keystore_address(&storage_path, &password)
        })
        .await
        .map_err(|e| anyhow!("keystore task failed: {e}"))??;
        debug!(%address, "identity address recovered from keystore");
        Ok(address)
    }
}

/// A Bee child process that answered `/health`.
pub struct BeeRunningNode {
    api: BeeApiClient,
    child: Mutex<Option<Child>>,
    mode: NodeMode,
    identity_address: IdentityAddress,
}

#[async_trait]
impl RunningNodePort for BeeRunningNode {
    fn effective_mode(&self) -> NodeMode {
        self.mode
    }

    fn identity_address(&self) -> IdentityAddress {
        self.identity_address.clone()
    }

    async fn connected_peers(&self) -> Result<usize> {
        self.api.connected_peers().await
    }

    async fn chequebook_balance(&self) -> Result<String> {
        self.api.chequebook_balance().await
    }

    async fn shutdown(&self) -> Result<()> {
        let mut guard = self.child.lock().await;
        if let Some(mut child) = guard.take() {
            stop_child(&mut child).await;
            info!("node process stopped");
        }
        Ok(())
    }
}

async fn stop_child(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        debug!(error = %e, "node process already gone");
    }
    match child.wait().await {
        Ok(status) => debug!(%status, "node process exited"),
        Err(e) => warn!(error = %e, "failed to reap node process"),
    }
}

fn forward_lines<R>(stream: &'static str, reader: R)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => debug!(target: "bee", stream, "{line}"),
                Ok(None) => break,
                Err(e) => {
                    warn!(target: "bee", stream, error = %e, "node output unreadable");
                    break;
                }
            }
        }
    });
}

/// `host:port` the node should bind its API to.
fn listen_addr(url: &reqwest::Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("node API URL has no host: {url}"))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| anyhow!("node API URL has no port: {url}"))?;
    Ok(format!("{host}:{port}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use sm_core::NetworkProfile;
    use tempfile::TempDir;

    fn descriptor(dir: &TempDir) -> NodeStartDescriptor {
        NodeStartDescriptor {
            data_dir: dir.path().join("node"),
            welcome_message: "hi".to_string(),
            nat_address: String::new(),
            rpc_endpoint: String::new(),
            swap_enable: false,
            profile: NetworkProfile::mainnet(),
        }
    }

    fn options(bee_binary: PathBuf, api_url: String) -> BeeServiceOptions {
        BeeServiceOptions {
            bee_binary,
            api_url,
            startup_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(50),
            request_timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn listen_addr_uses_default_port() {
        let url = reqwest::Url::parse("http://127.0.0.1:1633").unwrap();
        assert_eq!(listen_addr(&url).unwrap(), "127.0.0.1:1633");
        let url = reqwest::Url::parse("http://localhost").unwrap();
        assert_eq!(listen_addr(&url).unwrap(), "localhost:80");
    }

    #[tokio::test]
    async fn missing_binary_fails_to_launch() {
        let dir = TempDir::new().unwrap();
        let service = BeeNodeService::new(options(
            dir.path().join("no-such-bee"),
            "http://127.0.0.1:1633".to_string(),
        ));

        let err = service
            .start_node(&descriptor(&dir), &SecretString::new("pw"))
            .await
            .err()
            .unwrap();

        assert!(err.to_string().contains("failed to launch node binary"));
    }

    #[tokio::test]
    async fn recovery_reads_the_keystore_off_thread() {
        let dir = TempDir::new().unwrap();
        let service = BeeNodeService::new(BeeServiceOptions::default());

        let err = service
            .recover_identity_address(dir.path(), &SecretString::new("pw"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("keystore not found"));
    }

    /// Runs the fake node scripts one after another; exec'ing freshly written
    /// files from parallel tests can hit ETXTBSY.
    #[cfg(unix)]
    #[tokio::test]
    async fn supervises_a_child_process() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let script = |name: &str, body: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        };
        let crashing = script("crashing-bee", "exit 3");
        let pw_file = dir.path().join("seen-password");
        let sleeping = script(
            "sleeping-bee",
            &format!("printf '%s' \"$BEE_PASSWORD\" > {}\nexec sleep 30", pw_file.display()),
        );

        let mut server = Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .create_async()
            .await;
        server
            .mock("GET", "/node")
            .with_status(200)
            .with_body(r#"{"beeMode":"ultra-light"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/addresses")
            .with_status(200)
            .with_body(r#"{"ethereum":"0x1111222233334444555566667777888899990000"}"#)
            .create_async()
            .await;

        // A node that exits is reported without waiting for the timeout.
        let crashed = BeeNodeService::new(options(crashing, "http://127.0.0.1:9".to_string()))
            .start_node(&descriptor(&dir), &SecretString::new("pw"))
            .await
            .err()
            .unwrap();
        assert!(crashed.to_string().contains("exited before becoming ready"));

        let node = BeeNodeService::new(options(sleeping, server.url()))
            .start_node(&descriptor(&dir), &SecretString::new("Secr3t!"))
            .await
            .unwrap();

        assert_eq!(node.effective_mode(), NodeMode::Minimal);
        assert_eq!(
            node.identity_address().as_str(),
            "0x1111222233334444555566667777888899990000"
        );
        assert!(dir.path().join("node").is_dir());

        let deadline = Instant::now() + Duration::from_secs(5);
        while !pw_file.exists() && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(std::fs::read_to_string(&pw_file).unwrap(), "Secr3t!");

        node.shutdown().await.unwrap();
        node.shutdown().await.unwrap();
    }
}
