use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use keeper_core::{JobHandle, SessionOutcome};
use keeper_engine::{
    register, ChannelObserver, JobService, PollerEvent, PollerHandle, RegistrationOutcome,
    ReqwestJobService,
};
use keeper_logging::{keeper_info, keeper_warn};

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::logging::{self, LogDestination};
use crate::render;

pub fn run(cli: Cli) -> Result<ExitCode> {
    let config = AppConfig::resolve(cli.config.as_deref())?;

    let level_name = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let level = keeper_logging::parse_level(level_name)
        .with_context(|| format!("unknown log level {level_name:?}"))?;
    logging::initialize(LogDestination::from_option(cli.log_file.as_deref()), level);
    keeper_info!("backend {}", config.base_url);

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(dispatch(cli.cmd, config))
}

async fn dispatch(cmd: Command, config: AppConfig) -> Result<ExitCode> {
    let service = Arc::new(
        ReqwestJobService::new(config.client_settings()).context("failed to build backend client")?,
    );

    match cmd {
        Command::Register { url, memo } => register_url(service, &config, &url, memo.as_deref()).await,
        Command::Status { job } => {
            let job = JobHandle::new(job);
            let snapshot = service
                .query_status(&job)
                .await
                .with_context(|| format!("status query for job {job} failed"))?;
            println!("{}", render::snapshot_line(&job, &snapshot));
            if let Some(stage) = config.poll_settings().stage_for(&snapshot) {
                println!("{}", render::progress_line(&stage));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => {
            service
                .health()
                .await
                .with_context(|| format!("backend at {} is not healthy", config.base_url))?;
            println!("backend at {} is reachable", config.base_url);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn register_url(
    service: Arc<ReqwestJobService>,
    config: &AppConfig,
    url: &str,
    memo: Option<&str>,
) -> Result<ExitCode> {
    let (observer, mut events) = ChannelObserver::channel();
    let poller = PollerHandle::spawn(service.clone(), Arc::new(observer), config.poll_settings());

    let outcome = register(service.as_ref(), &poller, url, memo)
        .await
        .context("registration failed")?;
    match &outcome {
        RegistrationOutcome::AlreadyRegistered(job) => {
            println!("URL is already registered (job {job})");
            poller.shutdown();
            return Ok(ExitCode::SUCCESS);
        }
        RegistrationOutcome::Registered(job) => {
            println!("URL registered (job {job})");
            poller.shutdown();
            return Ok(ExitCode::SUCCESS);
        }
        RegistrationOutcome::Started(job) => {
            println!("URL registered (job {job}), processing started");
        }
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    let code = loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(PollerEvent::Stage { stage, .. }) => {
                    println!("{}", render::progress_line(&stage));
                }
                Some(PollerEvent::SessionEnded { job, outcome }) => {
                    if let Some(line) = render::outcome_line(&job, &outcome) {
                        println!("{line}");
                    }
                    break exit_code(&outcome);
                }
                None => {
                    keeper_warn!("poller stopped without ending the session");
                    break ExitCode::FAILURE;
                }
            },
            _ = &mut ctrl_c, if !interrupted => {
                keeper_info!("interrupted; cancelling job {}", outcome.job());
                interrupted = true;
                poller.cancel();
            }
        }
    };

    poller.shutdown();
    Ok(code)
}

fn exit_code(outcome: &SessionOutcome) -> ExitCode {
    match outcome {
        SessionOutcome::Completed => ExitCode::SUCCESS,
        SessionOutcome::Failed => ExitCode::from(2),
        SessionOutcome::Stalled { .. } => ExitCode::from(3),
        SessionOutcome::Cancelled => ExitCode::from(130),
        SessionOutcome::Replaced => ExitCode::FAILURE,
    }
}
