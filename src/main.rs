//! `mockdev` 바이너리 진입점.

use mockdev::interface::cli::{AppComposition, Cli, CliAction};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let action = Cli::parse_action();
    let composition = AppComposition::default();

    match action {
        CliAction::InspectConfig => match composition.inspect_config() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err:#}");
                std::process::exit(1);
            }
        },
        CliAction::Serve { listen } => {
            if let Err(err) = composition.serve(listen).await {
                eprintln!("error: {err:#}");
                std::process::exit(1);
            }
        }
        CliAction::Local => {
            if let Err(err) = composition.local_session().await {
                eprintln!("error: {err:#}");
                std::process::exit(1);
            }
        }
    }
}
