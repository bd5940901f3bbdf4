//! Download, unpack and run the executable a package descriptor points at.

mod context;

pub use context::{InstallContext, MANIFEST_FILE};

use log::{debug, info};
use std::sync::Arc;

use crate::archive::{ArchiveExtractor, TarballExtractor};
use crate::download::download_and_extract;
use crate::error::ShimError;
use crate::http::HttpClient;
use crate::package::PackageManifest;
use crate::platform::resolve_for_target;
use crate::runtime::{RealRuntime, Runtime};

/// Exit status reported when the child ends without one.
pub const MISSING_STATUS_EXIT_CODE: i32 = 1;

pub struct Installer<R: Runtime, E: ArchiveExtractor> {
    runtime: R,
    http_client: HttpClient,
    extractor: Arc<E>,
}

impl Installer<RealRuntime, TarballExtractor> {
    pub fn with_defaults() -> Result<Self, ShimError> {
        Ok(Self::new(
            RealRuntime,
            HttpClient::with_defaults()?,
            TarballExtractor,
        ))
    }
}

impl<R: Runtime, E: ArchiveExtractor + 'static> Installer<R, E> {
    pub fn new(runtime: R, http_client: HttpClient, extractor: E) -> Self {
        Self {
            runtime,
            http_client,
            extractor: Arc::new(extractor),
        }
    }

    /// Resolve, download, unpack and run. Returns the exit code to terminate
    /// with; every failure along the way is returned as an error instead.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn install_and_run(&self, ctx: &InstallContext) -> Result<i32, ShimError> {
        // Unsupported hosts fail before the descriptor is even read
        let target = ctx.host.target()?;

        let manifest = PackageManifest::load(&self.runtime, &ctx.manifest_path)?;
        let descriptor = manifest.validate()?;
        let metadata = resolve_for_target(&descriptor, target);
        debug!(
            "Resolved '{}' for {}: {}",
            metadata.name, target, metadata.url
        );

        let install_dir = ctx.install_dir();
        let program = download_and_extract(
            &self.http_client,
            Arc::clone(&self.extractor),
            &metadata.url,
            &metadata.name,
            &install_dir,
        )
        .await?;

        info!("Running {}...", program.display());
        let status = self
            .runtime
            .run(&program, &ctx.args, &ctx.cwd)
            .map_err(|source| ShimError::SpawnFailure {
                path: program.clone(),
                source,
            })?;

        Ok(status.unwrap_or_else(|| {
            info!("{} exited without a status code", program.display());
            MISSING_STATUS_EXIT_CODE
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::create_tar_gz;
    use crate::platform::HostPlatform;
    use crate::runtime::MockRuntime;
    use reqwest::Client;
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn manifest_json(url: &str) -> String {
        format!(
            r#"{{"version": "v1.0.0", "binary": {{"name": "mytool", "url": "{}"}}}}"#,
            url
        )
    }

    fn context(dir: &Path, host: HostPlatform, args: &[&str]) -> InstallContext {
        InstallContext::new(
            dir.to_path_buf(),
            dir.join("wrapper.js"),
            args.iter().map(OsString::from).collect(),
            host,
        )
    }

    fn installer(runtime: MockRuntime) -> Installer<MockRuntime, TarballExtractor> {
        Installer::new(runtime, HttpClient::new(Client::new()), TarballExtractor)
    }

    async fn serve_archive(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("GET", "/linux_amd64_1.0.0.tar.gz")
            .with_status(200)
            .with_body(create_tar_gz(&[("mytool", "#!/bin/sh\n", 0o755)]))
            .create_async()
            .await
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_install_and_run_forwards_args_and_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = serve_archive(&mut server).await;
        let template = format!("{}/{{{{platform}}}}_{{{{arch}}}}_{{{{version}}}}.tar.gz", server.url());

        let dir = tempdir().unwrap();
        let expected_program = dir.path().join("mytool");
        let expected_cwd = dir.path().to_path_buf();

        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(move |_| Ok(manifest_json(&template)));
        runtime
            .expect_run()
            .withf(move |program, args, cwd| {
                program == expected_program
                    && args == [OsString::from("--flag"), OsString::from("value")]
                    && cwd == expected_cwd
            })
            .times(1)
            .returning(|_, _, _| Ok(Some(3)));

        let ctx = context(dir.path(), HostPlatform::new("x64", "linux"), &["--flag", "value"]);
        let code = installer(runtime).install_and_run(&ctx).await.unwrap();

        mock.assert_async().await;
        assert_eq!(code, 3);
        assert!(dir.path().join("mytool").exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_status_exits_one() {
        let mut server = mockito::Server::new_async().await;
        let _mock = serve_archive(&mut server).await;
        let url = format!("{}/linux_amd64_1.0.0.tar.gz", server.url());

        let dir = tempdir().unwrap();
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(move |_| Ok(manifest_json(&url)));
        runtime.expect_run().returning(|_, _, _| Ok(None));

        let ctx = context(dir.path(), HostPlatform::new("x64", "linux"), &[]);
        let code = installer(runtime).install_and_run(&ctx).await.unwrap();
        assert_eq!(code, MISSING_STATUS_EXIT_CODE);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_spawn_error_is_spawn_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = serve_archive(&mut server).await;
        let url = format!("{}/linux_amd64_1.0.0.tar.gz", server.url());

        let dir = tempdir().unwrap();
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(move |_| Ok(manifest_json(&url)));
        runtime.expect_run().returning(|_, _, _| {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
        });

        let ctx = context(dir.path(), HostPlatform::new("x64", "linux"), &[]);
        let result = installer(runtime).install_and_run(&ctx).await;

        match result {
            Err(ShimError::SpawnFailure { path, .. }) => {
                assert_eq!(path, dir.path().join("mytool"))
            }
            other => panic!("expected SpawnFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unsupported_host_touches_nothing() {
        // Strict mock: reading the descriptor or spawning would panic
        let runtime = MockRuntime::new();
        let dir = tempdir().unwrap();

        let ctx = context(dir.path(), HostPlatform::new("mips", "linux"), &[]);
        let result = installer(runtime).install_and_run(&ctx).await;
        assert!(matches!(result, Err(ShimError::UnsupportedArchitecture(_))));

        let runtime = MockRuntime::new();
        let ctx = context(dir.path(), HostPlatform::new("x64", "aix"), &[]);
        let result = installer(runtime).install_and_run(&ctx).await;
        assert!(matches!(result, Err(ShimError::UnsupportedPlatform(_))));
    }

    #[tokio::test]
    async fn test_invalid_descriptor_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let url = server.url();

        let dir = tempdir().unwrap();
        let mut runtime = MockRuntime::new();
        runtime.expect_read_to_string().returning(move |_| {
            Ok(format!(r#"{{"binary": {{"name": "mytool", "url": "{}"}}}}"#, url))
        });

        let ctx = context(dir.path(), HostPlatform::new("x64", "linux"), &[]);
        let result = installer(runtime).install_and_run(&ctx).await;

        assert!(matches!(result, Err(ShimError::InvalidConfiguration(_))));
        mock.assert_async().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_empty_download_never_spawns() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/tool.tar.gz")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;
        let url = format!("{}/tool.tar.gz", server.url());

        let dir = tempdir().unwrap();
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(move |_| Ok(manifest_json(&url)));
        runtime.expect_run().times(0);

        let ctx = context(dir.path(), HostPlatform::new("x64", "linux"), &[]);
        let result = installer(runtime).install_and_run(&ctx).await;
        assert!(matches!(result, Err(ShimError::EmptyDownload(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_entry_never_spawns() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/tool.tar.gz")
            .with_status(200)
            .with_body(create_tar_gz(&[("othertool", "bin", 0o755)]))
            .create_async()
            .await;
        let url = format!("{}/tool.tar.gz", server.url());

        let dir = tempdir().unwrap();
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(move |_| Ok(manifest_json(&url)));
        runtime.expect_run().times(0);

        let ctx = context(dir.path(), HostPlatform::new("x64", "linux"), &[]);
        let result = installer(runtime).install_and_run(&ctx).await;

        assert!(matches!(result, Err(ShimError::ExtractionFailure { .. })));
        assert!(!dir.path().join("mytool").exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_windows_target_runs_exe() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/windows_amd64/mytool.exe.tar.gz")
            .with_status(200)
            .with_body(create_tar_gz(&[("mytool.exe", "MZ", 0o755)]))
            .create_async()
            .await;
        let template = format!(
            "{}/{{{{platform}}}}_{{{{arch}}}}/{{{{bin_name}}}}.tar.gz",
            server.url()
        );

        let dir = tempdir().unwrap();
        let expected_program: PathBuf = dir.path().join("mytool.exe");

        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(move |_| Ok(manifest_json(&template)));
        runtime
            .expect_run()
            .withf(move |program, _, _| program == expected_program)
            .returning(|_, _, _| Ok(Some(0)));

        let ctx = context(dir.path(), HostPlatform::new("x64", "win32"), &[]);
        let code = installer(runtime).install_and_run(&ctx).await.unwrap();
        assert_eq!(code, 0);
    }
}
