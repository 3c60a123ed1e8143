use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::instrument;

use crate::application::services::MorphologyService;
use crate::cli::args::{Cli, Commands, ConfigCommands, RootCommands, SchemeCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{DomainError, SchemeSummary, SchemeType, TreeNodeConvert, Validation};
use crate::infrastructure::ServiceContainer;

/// Run the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = load_settings(cli)?;
    if let Commands::Config { command } = command {
        return execute_config(command, &settings);
    }

    let container = ServiceContainer::new(settings)?;
    let mut service = container.open_service()?;
    let view = View {
        rtl: container.settings.rtl,
    };

    let mutated = match command {
        Commands::Root { command } => execute_root(command, &mut service, &container, &view)?,
        Commands::Scheme { command } => execute_scheme(command, &mut service, &view)?,
        Commands::Generate { root, scheme } => {
            let word = service.generate(root, scheme)?;
            output::info(&view.word(&word));
            true
        }
        Commands::Validate { root, word } => _validate(&mut service, root, word, &view)?,
        Commands::Analyze { word } => {
            _analyze(&service, word, container.settings.max_search_space, &view)?;
            false
        }
        Commands::Derivations { root } => {
            _derivations(&service, root, &view)?;
            false
        }
        Commands::Config { .. } | Commands::Completion { .. } => false,
    };

    if mutated {
        container.persist(&service)?;
    }
    Ok(())
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config_file.as_deref())?;
    if let Some(state) = &cli.state {
        settings.state_file = Some(state.clone());
    }
    settings.rtl |= cli.rtl;
    Ok(settings)
}

/// Presentation options.
struct View {
    rtl: bool,
}

impl View {
    fn word(&self, word: &str) -> String {
        if self.rtl {
            output::rtl(word)
        } else {
            word.to_string()
        }
    }
}

// ------------- roots -------------

/// Returns whether the engine changed.
#[instrument(level = "debug", skip(service, container, view))]
fn execute_root(
    command: &RootCommands,
    service: &mut MorphologyService,
    container: &ServiceContainer,
    view: &View,
) -> CliResult<bool> {
    match command {
        RootCommands::Add { roots } => _add_roots(service, roots, view),
        RootCommands::List => {
            for root in service.list_roots() {
                output::info(&view.word(&root));
            }
            Ok(false)
        }
        RootCommands::Show { root } => {
            let node = service.find_root(root)?;
            output::header(&view.word(node.root().as_str()));
            if node.derivations().is_empty() {
                output::detail(&"no derivations");
            }
            for d in node.derivations() {
                output::detail(&format!("{} ({})", view.word(&d.word), d.scheme));
            }
            Ok(false)
        }
        RootCommands::Load { file } => _load_roots(service, container, file),
        RootCommands::Tree => {
            output::info(&service.store().to_tree_string());
            Ok(false)
        }
        RootCommands::Count => {
            output::info(&service.root_count());
            Ok(false)
        }
    }
}

fn _add_roots(service: &mut MorphologyService, roots: &[String], view: &View) -> CliResult<bool> {
    let mut added = 0;
    let mut last_error = None;
    for root in roots {
        match service.add_root(root) {
            Ok(()) => {
                added += 1;
                output::success(&format!("added {}", view.word(root)));
            }
            Err(e @ DomainError::DuplicateRoot(_)) => output::warning(&e),
            Err(e) => {
                output::error(&e);
                last_error = Some(e);
            }
        }
    }
    match last_error {
        Some(e) if added == 0 => Err(e.into()),
        _ => Ok(added > 0),
    }
}

fn _load_roots(
    service: &mut MorphologyService,
    container: &ServiceContainer,
    file: &Path,
) -> CliResult<bool> {
    let report = container.root_loader().load_into(file, service)?;
    output::action(
        "Loaded",
        &format!(
            "{} roots from {} ({} duplicates, {} invalid)",
            report.added,
            file.display(),
            report.duplicates,
            report.invalid
        ),
    );
    if report.invalid > 0 {
        output::warning(&format!("{} lines were not 3-letter roots", report.invalid));
    }
    Ok(report.added > 0)
}

// ------------- schemes -------------

fn execute_scheme(
    command: &SchemeCommands,
    service: &mut MorphologyService,
    view: &View,
) -> CliResult<bool> {
    match command {
        SchemeCommands::Add {
            pattern,
            scheme_type,
        } => {
            service.add_scheme(pattern, *scheme_type)?;
            output::success(&format!("added scheme {}", view.word(pattern)));
            Ok(true)
        }
        SchemeCommands::Modify { name, pattern } => {
            service.modify_scheme(name, pattern)?;
            output::success(&format!(
                "scheme {} now uses {}",
                view.word(name),
                view.word(pattern)
            ));
            Ok(true)
        }
        SchemeCommands::Remove { name } => {
            service.remove_scheme(name)?;
            output::success(&format!("removed scheme {}", view.word(name)));
            Ok(true)
        }
        SchemeCommands::List { scheme_type } => {
            _list_schemes(service, *scheme_type, view);
            Ok(false)
        }
        SchemeCommands::Popular { limit } => {
            for (rank, scheme) in service.popular_schemes(*limit).iter().enumerate() {
                output::info(&format!("{:>3}. {}", rank + 1, describe_scheme(scheme, view)));
            }
            Ok(false)
        }
    }
}

fn _list_schemes(service: &MorphologyService, scheme_type: Option<SchemeType>, view: &View) {
    let schemes = match scheme_type {
        Some(t) => service.schemes_by_type(t),
        None => service.list_schemes(),
    };
    let lines = schemes
        .iter()
        .sorted_by(|a, b| {
            a.scheme_type
                .as_str()
                .cmp(b.scheme_type.as_str())
                .then_with(|| a.name.cmp(&b.name))
        })
        .map(|s| describe_scheme(s, view));
    for line in lines {
        output::info(&line);
    }
}

fn describe_scheme(scheme: &SchemeSummary, view: &View) -> String {
    let kind = match (&scheme.pattern, scheme.dynamic) {
        (Some(p), true) if *p != scheme.name => format!("dynamic: {}", view.word(p)),
        (_, true) => "dynamic".to_string(),
        (_, false) => "built-in".to_string(),
    };
    format!(
        "{}\t{}\t{}\tused {}",
        view.word(&scheme.name),
        scheme.scheme_type,
        kind,
        scheme.usage
    )
}

// ------------- derivation -------------

fn _validate(
    service: &mut MorphologyService,
    root: &str,
    word: &str,
    view: &View,
) -> CliResult<bool> {
    match service.validate(root, word)? {
        Validation::Valid { scheme } => {
            output::success(&format!(
                "{} = {} + {}",
                view.word(word),
                view.word(root),
                view.word(&scheme)
            ));
            Ok(true)
        }
        Validation::Invalid => {
            output::failure(&format!(
                "{} does not derive from {}",
                view.word(word),
                view.word(root)
            ));
            Ok(false)
        }
    }
}

fn _analyze(
    service: &MorphologyService,
    word: &str,
    max_search_space: usize,
    view: &View,
) -> CliResult<()> {
    let space = service.search_space();
    if space > max_search_space {
        return Err(CliError::Usage(format!(
            "search space {} exceeds max_search_space {}",
            space, max_search_space
        )));
    }
    match service.analyze(word) {
        Some(analysis) => output::success(&format!(
            "{} = {} + {}",
            view.word(word),
            view.word(analysis.root.as_str()),
            view.word(&analysis.scheme)
        )),
        None => output::failure(&format!("no root/scheme produces {}", view.word(word))),
    }
    Ok(())
}

fn _derivations(service: &MorphologyService, root: &str, view: &View) -> CliResult<()> {
    for d in service.list_derivations(root)? {
        output::info(&format!(
            "{}\t{}\t{}",
            view.word(&d.word),
            view.word(&d.scheme),
            d.created_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    Ok(())
}

// ------------- config -------------

fn execute_config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::action("global", &p.display()),
                None => output::warning(&"no config directory on this platform"),
            }
            output::action("state", &settings.state_path().display());
        }
    }
    Ok(())
}
