use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use multidata::cli::Cli;
use multidata::infra::config::Config;
use multidata::{RunSettings, Session};

fn main() -> Result<()> {
    let cli = Cli::parse();
    multidata::init(cli.verbose);

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let config = Config::load()?;
    let root = std::env::current_dir().context("unable to determine working directory")?;
    let mut settings = RunSettings::from_config(root, &config);
    if let Some(path) = cli.session {
        settings = settings.with_session_file(path);
    }

    let outcome = Session::new(settings).run(cli.config.as_deref())?;

    println!("Titles: {:?}", outcome.extraction.titles());
    if cli.contents {
        for (title, series) in outcome.extraction.iter() {
            println!("{title}: {}", series.join(" "));
        }
    }
    Ok(())
}
