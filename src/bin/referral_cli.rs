use std::sync::Arc;

use referral_core::{apply, cli::run_cli, form::application_schema, init, services::SystemClock, utils::build_info};

const USAGE: &str = "Usage: referral_cli [schema | --version | --help]";

#[tokio::main]
async fn main() {
    init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let result = match args.first().map(String::as_str) {
        None => run_cli().await.map_err(|err| err.to_string()),
        Some("--version") | Some("-V") => {
            println!("{}", build_info::current().summary());
            Ok(())
        }
        Some("--help") | Some("-h") => {
            println!("{USAGE}");
            Ok(())
        }
        Some("schema") => apply::wizard(Arc::new(SystemClock))
            .map(|wizard| println!("{:#}", application_schema(wizard.registry())))
            .map_err(|err| err.to_string()),
        Some(other) => Err(format!("unknown argument `{other}`\n{USAGE}")),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
