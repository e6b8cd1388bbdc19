use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use phpdoc_types::{
    Checker, ClassKind, ClassTable, Config, DeclarationContext, DocTagKind, Severity, TypeEnv,
    TypeRuleParser, UseAliasResolver, parse_php_doc, strip_comment_delimiters, try_find_tag,
};

/// Inspect and check PHPDoc annotations.
#[derive(Debug, Parser)]
#[command(name = "phpdoc-types", version, about)]
struct Cli {
    /// Directory searched for `phpdoc-types.toml` (defaults to the current directory).
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the tags of one doc comment as JSON.
    Tags {
        /// File holding the comment, or `-` for stdin.
        input: PathBuf,
        /// Line of the documented declaration, to compute tag lines.
        #[arg(long, default_value_t = 0)]
        line: i32,
    },
    /// Print the variable name and type next to the N-th tag of a kind.
    Find {
        /// File holding the comment, or `-` for stdin.
        input: PathBuf,
        /// Tag name without `@`, e.g. `param`, `var`, `return`.
        #[arg(long)]
        kind: String,
        #[arg(long, default_value_t = 0)]
        occurrence: usize,
    },
    /// Parse one type expression.
    ///
    /// Exits with failure when the type names an undeclared class.
    Parse {
        type_str: String,
        /// Namespace the type is written in.
        #[arg(long, default_value = "")]
        namespace: String,
        /// Import, as `Fqn` or `Alias=Fqn`.
        #[arg(long = "use")]
        uses: Vec<String>,
        /// Declared class (fully qualified).
        #[arg(long = "class")]
        classes: Vec<String>,
        /// Declared interface (fully qualified).
        #[arg(long = "interface")]
        interfaces: Vec<String>,
        /// Declared trait (fully qualified).
        #[arg(long = "trait")]
        traits: Vec<String>,
        /// Class enclosing the declaration, for `self`.
        #[arg(long = "self")]
        self_class: Option<String>,
        /// Print the AST as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Check the docblocks of every `.php` file under the given paths.
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct ParseOutput<'a> {
    canonical: String,
    ast: &'a phpdoc_types::TypeNode,
    unknown_classes: &'a [String],
    warnings: &'a [String],
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("PHPDOC_TYPES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read the current directory")?,
    };
    let config = Config::discover(&config_dir)
        .with_context(|| format!("failed to load config from {}", config_dir.display()))?;

    match cli.command {
        Command::Tags { input, line } => {
            let text = read_input(&input)?;
            let tags = parse_php_doc(strip_comment_delimiters(&text), line)
                .with_context(|| format!("{}", input.display()))?;
            print_json(&tags)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Find {
            input,
            kind,
            occurrence,
        } => {
            let text = read_input(&input)?;
            let kind = DocTagKind::from_name(&format!("@{}", kind.trim_start_matches('@')));
            let found = try_find_tag(strip_comment_delimiters(&text), 0, kind, occurrence)
                .with_context(|| format!("{}", input.display()))?;
            match found {
                Some(found) => {
                    print_json(&found)?;
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("tag not found");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Parse {
            type_str,
            namespace,
            uses,
            classes,
            interfaces,
            traits,
            self_class,
            json,
        } => {
            let table = ClassTable::new();
            for (names, kind) in [
                (&classes, ClassKind::Class),
                (&interfaces, ClassKind::Interface),
                (&traits, ClassKind::Trait),
            ] {
                for name in names {
                    table.declare(name, kind);
                }
            }

            let mut ctx = DeclarationContext::new().with_namespace(&namespace);
            for import in &uses {
                ctx = match import.split_once('=') {
                    Some((alias, fqn)) => ctx.with_use(alias, fqn),
                    None => ctx.with_use("", import),
                };
            }
            if let Some(name) = &self_class {
                let handle = table.declare(name, ClassKind::Class);
                ctx = ctx.with_enclosing_class(handle);
            }

            let env = TypeEnv::new(&table, &UseAliasResolver, &config);
            let parsed = TypeRuleParser::new(&ctx, env)
                .parse_from_type_string(&type_str)
                .with_context(|| format!("invalid type {type_str:?}"))?;

            if json {
                print_json(&ParseOutput {
                    canonical: parsed.node.to_string(),
                    ast: &parsed.node,
                    unknown_classes: &parsed.unknown_classes,
                    warnings: &parsed.warnings,
                })?;
            } else {
                println!("{}", parsed.node);
                for warning in &parsed.warnings {
                    eprintln!("warning: {warning}");
                }
                for name in &parsed.unknown_classes {
                    eprintln!("unresolved class: {name}");
                }
            }
            Ok(if parsed.unknown_classes.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Check { paths, json } => {
            let mut checker = Checker::new(config);
            for path in &paths {
                checker.add_path(path);
            }
            let report = checker.run();

            if json {
                print_json(&report)?;
            } else {
                for file in &report.files {
                    for diagnostic in &file.diagnostics {
                        let level = match diagnostic.severity {
                            Severity::Warning => "warning",
                            Severity::Error => "error",
                        };
                        match diagnostic.line {
                            Some(line) => println!("{}:{line}: {level}: {}", file.path.display(), diagnostic.message),
                            None => println!("{}: {level}: {}", file.path.display(), diagnostic.message),
                        }
                    }
                }
                println!(
                    "{} files, {} classes, {} docblocks, {} types, {} errors, {} warnings",
                    report.files.len(),
                    checker.classes().len(),
                    report.docblocks,
                    report.types,
                    report.count(Severity::Error),
                    report.count(Severity::Warning)
                );
            }

            Ok(if report.has_errors() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
