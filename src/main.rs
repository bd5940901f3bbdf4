use bin_shim::install::{InstallContext, Installer};
use bin_shim::platform::HostPlatform;
use bin_shim::runtime::{RealRuntime, Runtime};
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

/// bin-shim - run a prebuilt binary declared in a package descriptor
///
/// Reads `version` and `binary.{name,url}` from package.json, downloads the
/// release archive for this OS and architecture into the wrapper's directory,
/// then runs the binary with the remaining arguments and exits with its status.
///
/// Options must come before WRAPPER_PATH; everything after it is forwarded.
///
/// Examples:
///   bin-shim ./node_modules/.bin/mytool --help    # run `mytool --help`
#[derive(Parser, Debug)]
#[command(author, version = env!("BIN_SHIM_VERSION"), about)]
struct Cli {
    /// Package descriptor to read (defaults to package.json in the current directory)
    #[arg(
        long = "manifest",
        short = 'm',
        env = "BIN_SHIM_MANIFEST",
        value_name = "PATH"
    )]
    pub manifest: Option<PathBuf>,

    /// Print download and unpack progress to standard output
    #[arg(
        long,
        env = "BIN_SHIM_DEBUG",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub debug: bool,

    /// Architecture to resolve the release for (defaults to this host)
    #[arg(long, env = "BIN_SHIM_ARCH", value_name = "ARCH")]
    pub arch: Option<String>,

    /// Platform to resolve the release for (defaults to this host)
    #[arg(long, env = "BIN_SHIM_PLATFORM", value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Path of the invoking wrapper, followed by the arguments to forward
    #[arg(
        value_name = "WRAPPER_PATH [ARGS]",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

impl Cli {
    fn into_context(self, cwd: PathBuf) -> InstallContext {
        let detected = HostPlatform::detect();
        let host = HostPlatform::new(
            self.arch.unwrap_or(detected.arch),
            self.platform.unwrap_or(detected.os),
        );

        let mut command = self.command.into_iter();
        let wrapper_path = PathBuf::from(command.next().unwrap_or_default());
        let ctx = InstallContext::new(cwd, wrapper_path, command.collect(), host);

        match self.manifest {
            Some(path) => ctx.with_manifest(path),
            None => ctx,
        }
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "warn,bin_shim=debug" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if debug {
        builder.target(env_logger::Target::Stdout);
    }
    builder.init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Nothing better to report if the usage text cannot be written
            let _ = e.print();
            // --help and --version are not failures
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    init_logging(cli.debug);

    let cwd = RealRuntime
        .current_dir()
        .unwrap_or_else(|e| fail(format!("{:#}", e)));
    let ctx = cli.into_context(cwd);

    let installer = Installer::with_defaults().unwrap_or_else(|e| fail(e));
    match installer.install_and_run(&ctx).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(e.exit_code());
        }
    }
}
