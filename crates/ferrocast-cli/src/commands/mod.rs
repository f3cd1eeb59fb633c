mod forecast;

use ferrocast_core::{Envelope, ForecastReport, Settings};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli, settings: &Settings) -> Result<Envelope<ForecastReport>, CliError> {
    let mut settings = settings.clone();
    if let Some(timeout_ms) = cli.timeout_ms {
        settings.http_timeout_ms = timeout_ms;
    }

    match &cli.command {
        Command::Forecast(args) => {
            let offline = settings.offline || args.offline;
            let settings = settings.with_offline(offline);
            let source = settings.data_source();
            forecast::run(args, source.as_ref()).await
        }
    }
}
