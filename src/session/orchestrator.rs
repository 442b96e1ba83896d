// ABOUTME: Session orchestrator: authenticates, resolves targets, and picks a driver.
// ABOUTME: One target without a command goes interactive; a command runs in batch.

use super::batch::{HostReport, run_batch};
use super::interactive::run_interactive;
use super::stdio::Stdio;
use super::terminal::LocalTerminal;
use super::SessionExit;
use crate::diagnostics::Diagnostics;
use crate::directory::InstanceDirectory;
use crate::error::{Error, Result};
use crate::output::Output;
use crate::resolve::{find_running, select_addresses};
use crate::ssh::{AuthContext, Transport};
use crate::types::SessionRequest;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Interactive(SessionExit),
    Batch(Vec<HostReport>),
}

/// Entry point tying the directory, transport, and local terminal together.
pub struct Orchestrator<'a, D: ?Sized, T: ?Sized, L: ?Sized> {
    directory: &'a D,
    transport: &'a T,
    terminal: &'a L,
    output: &'a Output,
}

impl<'a, D, T, L> Orchestrator<'a, D, T, L>
where
    D: InstanceDirectory + ?Sized,
    T: Transport + ?Sized,
    L: LocalTerminal + ?Sized,
{
    pub fn new(directory: &'a D, transport: &'a T, terminal: &'a L, output: &'a Output) -> Self {
        Self {
            directory,
            transport,
            terminal,
            output,
        }
    }

    /// Run one invocation.
    ///
    /// Warnings collected along the way are printed whether or not the run
    /// succeeds.
    pub async fn run(&self, request: &SessionRequest, stdio: Stdio) -> Result<Outcome> {
        let mut diag = Diagnostics::default();
        let result = self.run_inner(request, stdio, &mut diag).await;

        for warning in diag.warnings() {
            self.output.warning(&warning.message);
        }

        result
    }

    async fn run_inner(
        &self,
        request: &SessionRequest,
        mut stdio: Stdio,
        diag: &mut Diagnostics,
    ) -> Result<Outcome> {
        let auth = AuthContext::from_identity_file(request.login_name(), request.identity_file())?;

        self.output
            .progress(&format!("  → Resolving {} instances...", request.filter()));
        let instances = find_running(self.directory, request.filter()).await?;

        // The count decides the mode before any address is looked at.
        if request.command().is_none() && instances.len() > 1 {
            return Err(Error::AmbiguousTarget {
                filter: request.filter().to_string(),
                count: instances.len(),
            });
        }
        let targets = select_addresses(&instances, request.address())?;

        match request.command() {
            None => {
                let target = targets.first();
                self.output
                    .progress(&format!("  → Connecting to {}...", target));
                let exit =
                    run_interactive(self.transport, self.terminal, target, &auth, stdio, diag)
                        .await?;
                Ok(Outcome::Interactive(exit))
            }
            Some(command) => {
                self.output.progress(&format!(
                    "  → Running on {} host(s): {}",
                    targets.len(),
                    command
                ));
                let reports = run_batch(
                    self.transport,
                    self.terminal,
                    &targets,
                    &auth,
                    command,
                    &mut stdio.stdout,
                    diag,
                )
                .await?;
                Ok(Outcome::Batch(reports))
            }
        }
    }
}
