//! CLI 명령 파싱 모듈.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "mockdev")]
#[command(about = "Mock network device serving nested interactive CLI sessions")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve device sessions over TCP
    Serve {
        /// Listen address, e.g. 0.0.0.0:8023
        #[arg(long)]
        listen: Option<String>,
    },
    /// Run a single device session on the local terminal
    Local,
    /// Show effective merged config
    Config,
}

pub enum CliAction {
    Serve { listen: Option<String> },
    Local,
    InspectConfig,
}

impl Cli {
    pub fn parse_action() -> CliAction {
        let cli = Cli::parse();

        match cli.command {
            Some(Commands::Serve { listen }) => CliAction::Serve { listen },
            Some(Commands::Local) => CliAction::Local,
            Some(Commands::Config) => CliAction::InspectConfig,
            // 서브커맨드가 없으면 리스너를 띄운다.
            None => CliAction::Serve { listen: None },
        }
    }
}
