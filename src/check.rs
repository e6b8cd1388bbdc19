//! Checking the docblocks of a whole project.
//!
//! The [`Checker`] works in two phases so that a docblock may name a class
//! declared later in the same project:
//!
//!   1. **Collect**: every `.php` file under the given paths is scanned
//!      (honouring `.gitignore`), and every class-like it declares is
//!      registered in a shared [`ClassTable`].
//!   2. **Check**: every docblock is run through
//!      [`DocAnnotations::collect`] against the complete table, and the
//!      diagnostics are gathered per file.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::annotations::DocAnnotations;
use crate::config::Config;
use crate::diagnostics::{Diagnostic, DiagnosticLog, Severity};
use crate::names::UseAliasResolver;
use crate::source::{SourceFile, scan_source};
use crate::symbols::ClassTable;
use crate::type_parser::TypeEnv;

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub docblocks: usize,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub files: Vec<FileReport>,
    /// Docblocks examined.
    pub docblocks: usize,
    /// Tag types parsed successfully.
    pub types: usize,
}

impl CheckReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.files
            .iter()
            .flat_map(|f| f.diagnostics.iter())
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }
}

pub struct Checker {
    config: Config,
    classes: ClassTable,
    resolver: UseAliasResolver,
    sources: Vec<(PathBuf, SourceFile)>,
    unreadable: Vec<(PathBuf, String)>,
}

impl Checker {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            classes: ClassTable::new(),
            resolver: UseAliasResolver,
            sources: Vec::new(),
            unreadable: Vec::new(),
        }
    }

    /// Scan every `.php` file under `path` (a file or a directory).
    ///
    /// Returns the number of files added.
    pub fn add_path(&mut self, path: &Path) -> usize {
        let mut added = 0;
        for entry in ignore::WalkBuilder::new(path).build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("skipping entry: {err}");
                    continue;
                }
            };
            let is_php_file = entry.file_type().is_some_and(|t| t.is_file())
                && entry.path().extension().is_some_and(|ext| ext == "php");
            if !is_php_file {
                continue;
            }

            match std::fs::read_to_string(entry.path()) {
                Ok(content) => {
                    self.add_source(entry.path().to_path_buf(), &content);
                    added += 1;
                }
                Err(err) => {
                    tracing::warn!("cannot read {}: {err}", entry.path().display());
                    self.unreadable
                        .push((entry.path().to_path_buf(), err.to_string()));
                }
            }
        }
        added
    }

    /// Scan one file's content and register the classes it declares.
    pub fn add_source(&mut self, path: PathBuf, content: &str) {
        let file = scan_source(content);
        for class in &file.classes {
            self.classes.declare(&class.name, class.kind);
        }
        tracing::debug!(
            "scanned {}: {} classes, {} docblocks",
            path.display(),
            file.classes.len(),
            file.docblocks.len()
        );
        self.sources.push((path, file));
    }

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    /// Check every docblock of every added file.
    pub fn run(&self) -> CheckReport {
        let env = TypeEnv::new(&self.classes, &self.resolver, &self.config);
        let mut report = CheckReport::default();

        for (path, message) in &self.unreadable {
            report.files.push(FileReport {
                path: path.clone(),
                docblocks: 0,
                diagnostics: vec![Diagnostic::error(None, message.clone())],
            });
        }

        for (path, file) in &self.sources {
            let sink = DiagnosticLog::new();
            for site in &file.docblocks {
                let ctx = file.context_for(site, &self.classes);
                let annotations = DocAnnotations::collect(&site.body, &ctx, env, &sink);
                report.types += annotations
                    .typed_tags()
                    .filter(|tag| tag.ty.is_some())
                    .count();
            }
            report.docblocks += file.docblocks.len();
            report.files.push(FileReport {
                path: path.clone(),
                docblocks: file.docblocks.len(),
                diagnostics: sink.drain(),
            });
        }

        report
    }
}
