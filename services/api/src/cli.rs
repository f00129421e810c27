use crate::demo::{run_demo, run_dossier, run_vcard, DemoArgs, DossierArgs, VCardArgs};
use crate::server;
use agent_card::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Agent Card",
    about = "Serve and exercise the real-estate contact card and project qualification flow",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Format a project dossier from a JSON answers document
    Dossier(DossierArgs),
    /// Print the vCard served for a contact
    Vcard(VCardArgs),
    /// Walk through the qualification wizard with scripted answers
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Dossier(args) => run_dossier(args),
        Command::Vcard(args) => run_vcard(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["agent-card-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn dossier_accepts_answers_contact_and_copy_target() {
        let cli = Cli::try_parse_from([
            "agent-card-api",
            "dossier",
            "--answers",
            "answers.json",
            "--contact",
            "matthis",
            "--copy-to",
            "dossier.txt",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Dossier(args)) => {
                assert_eq!(args.answers, "answers.json");
                assert_eq!(args.contact, "matthis");
                assert!(args.copy_to.is_some());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn vcard_requires_a_slug() {
        assert!(Cli::try_parse_from(["agent-card-api", "vcard"]).is_err());
        let cli = Cli::try_parse_from(["agent-card-api", "vcard", "matthis"]).expect("parses");
        assert!(matches!(cli.command, Some(Command::Vcard(_))));
    }
}
