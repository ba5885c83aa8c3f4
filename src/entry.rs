use std::io::Write;
use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches};
use tracing::error;

use itsctl::args::{CliArgs, Command, Invocation};
use itsctl::config::{ResolvedSettings, load_config, resolve_settings};
use itsctl::domain::{DiagnosticCommand, visible_sections};
use itsctl::error::AppResult;
use itsctl::http::{HttpTransport, run as run_command};
use itsctl::outcome::{Outcome, OutcomeKind};
use itsctl::ui::{OutputFormat, finish_progress_line, print_outcome, progress_reporter};

pub(crate) fn run() -> ExitCode {
    match try_run() {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("{}", err);
            eprintln!("Error: {}", err);
            ExitCode::from(OutcomeKind::ApplicationError.exit_code())
        }
    }
}

fn try_run() -> AppResult<u8> {
    let matches = CliArgs::command().get_matches();
    let args = CliArgs::from_arg_matches(&matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let config = load_config(args.config.as_deref())?;
    let settings = resolve_settings(&args, config.as_ref())?;

    if let Command::Sections(sections) = &args.command {
        print_sections(&sections.target.invocation(), settings.format)?;
        return Ok(0);
    }
    let Some(invocation) = args.command.invocation() else {
        return Ok(0);
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(dispatch(&args, &settings, invocation))?;

    print_outcome(&outcome, settings.format, args.no_color)?;
    Ok(outcome.kind.exit_code())
}

async fn dispatch(
    args: &CliArgs,
    settings: &ResolvedSettings,
    invocation: Invocation,
) -> AppResult<Outcome> {
    let transport = HttpTransport::new(settings.server.clone())?;
    let is_transfer = matches!(
        invocation.command,
        DiagnosticCommand::Upload | DiagnosticCommand::Download
    );
    let progress = if args.no_progress || !is_transfer {
        None
    } else {
        progress_reporter(args.no_color)
    };

    let outcome = run_command(
        &transport,
        invocation.command,
        &invocation.options,
        progress.as_ref(),
    )
    .await;

    if progress.is_some() {
        finish_progress_line()?;
    }
    Ok(outcome)
}

fn print_sections(invocation: &Invocation, format: OutputFormat) -> AppResult<()> {
    let names: Vec<&'static str> = visible_sections(invocation.command, &invocation.options)
        .into_iter()
        .map(|section| section.as_str())
        .collect();
    let mut out = std::io::stdout();
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&names)?)?,
        OutputFormat::Plain | OutputFormat::Html => {
            for name in names {
                writeln!(out, "{}", name)?;
            }
        }
    }
    Ok(())
}
