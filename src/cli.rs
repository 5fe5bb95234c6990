use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "ssoprof",
    version,
    about = "Generate AWS CLI profiles from IAM Identity Center accounts and roles"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Default client region for generated profiles"
    )]
    pub region: Option<String>,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Configure(ConfigureArgs),
}

#[derive(Debug, Args)]
pub struct ConfigureArgs {
    #[command(subcommand)]
    pub command: ConfigureCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigureCommand {
    #[command(name = "sso-profiles")]
    SsoProfiles(SsoProfilesArgs),
}

impl ConfigureCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ConfigureCommand::SsoProfiles(_) => "sso-profiles",
        }
    }
}

#[derive(Debug, Args)]
pub struct SsoProfilesArgs {
    #[arg(help = "SSO session name to look up accounts and roles")]
    pub sso_session: Option<String>,
    #[arg(
        long,
        help = "Print the verification URL instead of launching a browser"
    )]
    pub no_browser: bool,
}
