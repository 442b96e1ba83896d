// ABOUTME: Entry point for the ec2sh CLI application.
// ABOUTME: Parses arguments, loads config, and dispatches to the session orchestrator.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, InitTarget};
use ec2sh::config::{self, Config};
use ec2sh::directory::Ec2Directory;
use ec2sh::error::Result;
use ec2sh::output::{Output, OutputMode};
use ec2sh::session::{ConsoleTerminal, Orchestrator, Outcome, Stdio};
use ec2sh::ssh::SshTransport;
use ec2sh::types::{AddressPreference, SessionRequest, split_login};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);

    // Exit explicitly: a blocked stdin read must not hold the runtime open.
    let code = match run(cli, &mut output).await {
        Ok(()) => 0,
        Err(e) => {
            output.error(&e.to_string());
            1
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli, output: &mut Output) -> Result<()> {
    match cli.command {
        Commands::Init {
            target: InitTarget::Config { force },
        } => {
            let path = match cli.config {
                Some(path) => path,
                None => Config::default_path()?,
            };
            config::init_config(&path, force)?;
            output.success(&format!("Created {}", path.display()));
            Ok(())
        }
        Commands::Init {
            target: InitTarget::Profile { force },
        } => {
            let path = config::default_credentials_path()?;
            config::init_profile(&path, force)?;
            output.success(&format!("Created {}", path.display()));
            Ok(())
        }
        Commands::Ssh {
            destination,
            login_name,
            identity_file,
            private,
            command,
        } => {
            let config = Config::discover(cli.config.as_deref())?;

            let (user, filter) = split_login(&destination);
            let login_name = login_name
                .or_else(|| user.map(str::to_string))
                .unwrap_or_else(|| config.ssh.login_name.clone());
            let identity_file = identity_file.unwrap_or_else(|| config.ssh.identity_file.clone());
            let address = if private {
                AddressPreference::Private
            } else {
                config.ssh.address
            };

            let request = SessionRequest::builder(filter)
                .login_name(login_name)
                .identity_file(identity_file)
                .address(address)
                .command_words(&command)
                .build()?;

            let profile = cli.profile.or(config.profile);
            let region = cli.region.or(config.region);
            let directory = Ec2Directory::connect(profile.as_deref(), region.as_deref()).await;
            let transport = SshTransport::new().connect_timeout(config.ssh.connect_timeout);

            output.start_timer();
            let outcome = Orchestrator::new(&directory, &transport, &ConsoleTerminal, output)
                .run(&request, Stdio::inherit())
                .await?;

            if let Outcome::Batch(reports) = outcome {
                output.success(&format!("  ✓ Command succeeded on {} host(s)", reports.len()));
            }
            Ok(())
        }
    }
}
