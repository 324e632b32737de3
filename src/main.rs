mod cli;
mod handlers;
mod printer;
mod tui;

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use anyhow::{bail, Context, Result};
use compilerd::{config::Config, language::Language, logging, runner::RunnerClient, session::Session};
use is_terminal::IsTerminal;

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn read_process_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).context("cannot read stdin")?;
    Ok(buf)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    if args.list_languages {
        println!("{:<8} {:<8} {:<12} {}", "ID", "WIRE", "EDITOR MODE", "NAME");
        for lang in Language::ALL {
            println!(
                "{:<8} {:<8} {:<12} {}",
                lang.to_string(),
                lang.wire_id(),
                lang.mode().as_str(),
                lang.label()
            );
        }
        return Ok(());
    }

    // CLI overrides config
    let mut cfg = Config::load();
    if let Some(url) = &args.base_url {
        cfg.set("RUNNER_BASE_URL", url.clone());
    }
    if let Some(secs) = args.timeout {
        cfg.set("REQUEST_TIMEOUT", secs.to_string());
    }

    let one_shot = args.run || !io::stdout().is_terminal();
    if one_shot {
        logging::init_stderr()?;
    } else {
        logging::init_file(&cfg.log_file())?;
    }
    tracing::debug!(config = %cfg.config_path.display(), one_shot, "starting");

    let language = match args.language {
        Some(lang) => lang,
        None => cfg.default_language()?,
    };

    let stdin_is_tty = io::stdin().is_terminal();
    let stdin_from_pipe = args.input.as_deref() == Some(Path::new("-"));
    if stdin_from_pipe && !one_shot {
        bail!("--input - can only be used with --run");
    }

    // Script: --file, else piped stdin in one-shot mode
    let script = match &args.file {
        Some(path) => read_file(path)?,
        None if one_shot && !stdin_is_tty && !stdin_from_pipe => read_process_stdin()?,
        None => String::new(),
    };
    let program_input = match &args.input {
        Some(_) if stdin_from_pipe => read_process_stdin()?,
        Some(path) => read_file(path)?,
        None => String::new(),
    };

    let mut session = Session::new(language).with_policy(cfg.settle_policy()?);
    session.set_script(script);
    session.set_stdin(program_input);

    let client = RunnerClient::from_config(&cfg)?;

    if one_shot {
        let ok = handlers::run::run(session, &client, args.raw).await?;
        if !ok {
            std::process::exit(1);
        }
        Ok(())
    } else {
        tui::run_tui(session, client).await
    }
}
