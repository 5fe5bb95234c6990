use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use crate::cli::{Cli, Command, ConfigureCommand};
use crate::commands;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

type CommandFuture<'a> = Pin<Box<dyn Future<Output = AppResult<()>> + 'a>>;
type CommandHandler = for<'a> fn(&'a AppContext, ConfigureCommand) -> CommandFuture<'a>;

/// Named operations under the configure command group. Handlers are
/// registered once at process initialization and looked up by subcommand
/// name at dispatch time.
#[derive(Default)]
pub struct CommandTable {
    handlers: BTreeMap<&'static str, CommandHandler>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &'static str, handler: CommandHandler) {
        self.handlers.insert(name, handler);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    pub async fn dispatch(&self, ctx: &AppContext, command: ConfigureCommand) -> AppResult<()> {
        let name = command.name();
        let handler = self.handlers.get(name).ok_or_else(|| {
            AppError::InvalidInput(format!("unknown configure command `{name}`"))
        })?;
        handler(ctx, command).await
    }
}

pub fn register_configure_commands(table: &mut CommandTable) {
    table.register("sso-profiles", sso_profiles_handler);
}

fn sso_profiles_handler(ctx: &AppContext, command: ConfigureCommand) -> CommandFuture<'_> {
    Box::pin(async move {
        match command {
            ConfigureCommand::SsoProfiles(args) => commands::sso_profiles::run(ctx, args).await,
        }
    })
}

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        region,
        json,
        verbose,
        command,
    } = cli;

    let ctx = AppContext::bootstrap(region, json, verbose)?;

    let mut table = CommandTable::new();
    register_configure_commands(&mut table);

    match command {
        Command::Configure(args) => table.dispatch(&ctx, args.command).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_sso_profiles_command() {
        let mut table = CommandTable::new();
        register_configure_commands(&mut table);
        assert_eq!(table.names(), ["sso-profiles"]);
    }
}
