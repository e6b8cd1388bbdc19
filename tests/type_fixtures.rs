//! Data-driven type parser tests.
//!
//! Each `tests/fixtures/*.type` file is a list of `key: value` lines:
//!
//! ```text
//! class: My\Class           declared class (repeatable; also `interface:`, `trait:`)
//! namespace: App            namespace the type is written in
//! input: tuple<int, \My\Class>
//! output: tuple<int,\My\Class>   canonical text of the parsed type
//! error: ...                or the expected error message
//! warnings: 1               number of style warnings (default 0)
//! ```

use std::path::Path;

use phpdoc_types::{
    ClassKind, ClassTable, Config, DeclarationContext, TypeEnv, TypeRuleParser, UseAliasResolver,
};

#[derive(Default)]
struct Fixture {
    declared: Vec<(String, ClassKind)>,
    namespace: String,
    input: Option<String>,
    output: Option<String>,
    error: Option<String>,
    warnings: usize,
}

fn parse_fixture(content: &str) -> Result<Fixture, String> {
    let mut fixture = Fixture::default();
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let (key, value) = line
            .split_once(": ")
            .ok_or_else(|| format!("not a `key: value` line: {line:?}"))?;
        match key {
            "class" => fixture.declared.push((value.to_string(), ClassKind::Class)),
            "interface" => fixture.declared.push((value.to_string(), ClassKind::Interface)),
            "trait" => fixture.declared.push((value.to_string(), ClassKind::Trait)),
            "namespace" => fixture.namespace = value.to_string(),
            "input" => fixture.input = Some(value.to_string()),
            "output" => fixture.output = Some(value.to_string()),
            "error" => fixture.error = Some(value.to_string()),
            "warnings" => {
                fixture.warnings = value.parse().map_err(|e| format!("bad warnings count: {e}"))?
            }
            other => return Err(format!("unknown key {other:?}")),
        }
    }
    Ok(fixture)
}

fn run_fixture(path: &Path) -> datatest_stable::Result<()> {
    let content = std::fs::read_to_string(path)?;
    let fixture = parse_fixture(&content)?;
    let input = fixture.input.as_deref().ok_or("fixture has no `input:` line")?;

    let classes = ClassTable::new();
    for (name, kind) in &fixture.declared {
        classes.declare(name, *kind);
    }
    let config = Config::default();
    let env = TypeEnv::new(&classes, &UseAliasResolver, &config);
    let ctx = DeclarationContext::new().with_namespace(&fixture.namespace);

    match (TypeRuleParser::new(&ctx, env).parse_from_type_string(input), &fixture.error) {
        (Ok(parsed), None) => {
            let expected = fixture.output.as_deref().ok_or("fixture has no `output:` line")?;
            let actual = parsed.node.to_string();
            if actual != expected {
                return Err(format!("{input}: expected {expected}, got {actual}").into());
            }
            if parsed.warnings.len() != fixture.warnings {
                return Err(format!(
                    "{input}: expected {} warnings, got {:?}",
                    fixture.warnings, parsed.warnings
                )
                .into());
            }
            Ok(())
        }
        (Err(err), Some(expected)) if err.to_string() == *expected => Ok(()),
        (Err(err), Some(expected)) => {
            Err(format!("{input}: expected error {expected:?}, got {:?}", err.to_string()).into())
        }
        (Err(err), None) => Err(format!("{input}: unexpected error: {err}").into()),
        (Ok(parsed), Some(expected)) => {
            Err(format!("{input}: expected error {expected:?}, parsed {}", parsed.node).into())
        }
    }
}

datatest_stable::harness! {
    { test = run_fixture, root = "tests/fixtures", pattern = r"\.type$" },
}
