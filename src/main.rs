use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use bumpkin::analyzer::{analyze_commits, commits_since_latest};
use bumpkin::boundary::{detect_boundary_warnings, BoundaryWarning};
use bumpkin::cli::{
    analysis_json, exit_status, write_completion, Cli, Command, ExitError, ExitStatus, JsonOutput,
};
use bumpkin::config::{init_config, load_config, Config};
use bumpkin::git::{Git2Repository, Repository};
use bumpkin::hooks::{buffer::DEFAULT_MAX_LINES, CancelToken, HookRunner, OutputMode};
use bumpkin::logging::{init_tracing, level_for_verbosity};
use bumpkin::release::{ReleaseError, ReleaseOrchestrator};
use bumpkin::ui;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(level_for_verbosity(cli.verbose));

    match run(&cli) {
        Ok(()) => ExitStatus::Success.into(),
        Err(err) => {
            report_error(&cli, &err);
            exit_status(&err).into()
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Command::Init) => init(cli),
        Some(Command::Completion { shell }) => {
            write_completion(*shell, &mut std::io::stdout());
            Ok(())
        }
        Some(Command::Current) => {
            let (repo, config) = open_repository(cli)?;
            show_current(cli, &repo, &config)
        }
        Some(Command::Analyze) => {
            let (repo, config) = open_repository(cli)?;
            show_analysis(cli, &repo, &config)
        }
        None => {
            let (repo, config) = open_repository(cli)?;
            release(cli, &repo, &config)
        }
    }
}

fn open_repository(cli: &Cli) -> Result<(Git2Repository, Config)> {
    let config = cli.effective_config(load_config(cli.config.as_deref())?);

    let repo = Git2Repository::open(".").map_err(|e| {
        ExitError::new(
            ExitStatus::NotGitRepo,
            format!("not a git repository: {}", e),
        )
    })?;
    Ok((repo, config))
}

fn init(cli: &Cli) -> Result<()> {
    let path = init_config(Path::new("."))?;
    let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();

    if cli.json {
        let value = serde_json::json!({ "created": name });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        ui::display_success(&format!("Created {}", name));
    }
    Ok(())
}

fn show_current(cli: &Cli, repo: &Git2Repository, config: &Config) -> Result<()> {
    let latest = repo.latest_tag(&config.prefix)?;

    if cli.json {
        let value = serde_json::json!({
            "tag": latest.as_ref().map(|found| found.tag.name.clone()),
            "version": latest.as_ref().map(|found| found.version.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match latest {
        Some(found) => println!("{}", found.tag.name),
        None => println!("No version tags found"),
    }
    Ok(())
}

fn show_analysis(cli: &Cli, repo: &Git2Repository, config: &Config) -> Result<()> {
    let (latest, commits) = commits_since_latest(repo, &config.prefix)?;
    let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
    let analysis = analyze_commits(&messages);

    if cli.json {
        let value = analysis_json(latest.as_ref(), &analysis);
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        ui::display_analysis(latest.as_ref(), &commits, &analysis);
    }
    Ok(())
}

fn release(cli: &Cli, repo: &Git2Repository, config: &Config) -> Result<()> {
    let bump = cli.bump.selected()?.ok_or_else(|| {
        ExitError::new(
            ExitStatus::InvalidArgs,
            "no bump type specified (use --patch, --minor, --major, --set-version, \
             --conventional, --alpha, --beta, --rc, --release or --bump)",
        )
    })?;
    let request = cli.release_request(config, bump);

    // Hook output would corrupt the JSON document on stdout.
    let output_mode = if cli.json {
        OutputMode::Capture {
            max_lines: DEFAULT_MAX_LINES,
        }
    } else {
        OutputMode::Inherit
    };
    let orchestrator = ReleaseOrchestrator::new(repo, HookRunner::new(output_mode));

    let needs_confirmation = !cli.yes && !request.dry_run;
    if needs_confirmation && cli.json {
        return Err(ExitError::new(
            ExitStatus::InvalidArgs,
            "confirmation required: use --yes together with --json",
        )
        .into());
    }

    let warnings = detect_boundary_warnings(repo, request.prefix(), request.remote(), request.push)?;
    if !cli.json {
        for warning in &warnings {
            ui::display_boundary_warning(warning);
        }
    }

    if needs_confirmation {
        let plan = orchestrator.plan(&request)?;
        ui::display_proposed_release(
            &plan.previous.to_string(),
            &plan.next.to_string(),
            &plan.next.with_prefix(request.prefix()),
        );

        let no_new_commits = warnings
            .iter()
            .any(|w| matches!(w, BoundaryWarning::NoNewCommits { .. }));
        let prompt = if no_new_commits {
            "No new commits since the latest tag. Create the release anyway?"
        } else {
            "Create this release?"
        };
        if !ui::confirm_action(prompt)? {
            return Err(ExitError::new(ExitStatus::UserCancelled, "Operation cancelled by user").into());
        }
    }

    let cancel = match cli.hook_timeout() {
        Some(timeout) => CancelToken::with_timeout(timeout),
        None => CancelToken::new(),
    };
    if let Err(e) = cancel.cancel_on_ctrlc() {
        warn!(error = %e, "Ctrl-C will not cancel running hooks");
    }

    let result = orchestrator.execute(&request, &cancel)?;

    if cli.json {
        println!(
            "{}",
            JsonOutput::from_result(&result, request.dry_run).render()?
        );
        return Ok(());
    }

    ui::display_release_result(&result, request.dry_run);
    if result.tag_created && !result.pushed {
        ui::display_manual_push_instruction(&result.tag_name, request.remote());
    }
    Ok(())
}

fn report_error(cli: &Cli, err: &anyhow::Error) {
    let release_error = err.downcast_ref::<ReleaseError>();

    if cli.json {
        let output = match release_error {
            Some(release_error) => JsonOutput::from_release_error(release_error, cli.dry_run),
            None => JsonOutput::from_message(format!("{:#}", err), cli.dry_run),
        };
        match output.render() {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => ui::display_error(&format!("{:#} (JSON output failed: {})", err, e)),
        }
        return;
    }

    match release_error {
        Some(release_error) => ui::display_release_error(release_error),
        None => ui::display_error(&format!("{:#}", err)),
    }
}
