use std::fmt::{Display, Formatter};

use crate::constants::NX_BIN;

/// A program and its arguments, ready to be spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionAction {
    /// The executable program (e.g., "nx", "npx").
    pub program: String,
    /// The arguments to pass to the program.
    pub args: Vec<String>,
}

impl ExecutionAction {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// An invocation of the monorepo build tool.
    pub fn nx(args: Vec<String>) -> Self {
        Self::new(NX_BIN, args)
    }

    /// Builds an action from a whitespace-separated command template.
    ///
    /// `{project}` and `{name}` are substituted in every word; words left
    /// empty are dropped. Returns `None` for a blank template.
    pub fn from_template(template: &str, project: &str, name: &str) -> Option<Self> {
        let mut words = template
            .split_whitespace()
            .map(|word| word.replace("{project}", project).replace("{name}", name))
            .filter(|word| !word.is_empty());
        let program = words.next()?;
        Some(Self::new(program, words.collect()))
    }

    pub fn with_args(mut self, extra: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(extra);
        self
    }

    /// The command line as it would be typed.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Display for ExecutionAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_substitutes_placeholders() {
        let action = ExecutionAction::from_template(
            "npx tsx scripts/audit.ts --project={project} {name}",
            "@fux/dynamicons-core",
            "dynamicons",
        )
        .expect("template should produce an action");
        assert_eq!(action.program, "npx");
        assert_eq!(
            action.args,
            vec![
                "tsx",
                "scripts/audit.ts",
                "--project=@fux/dynamicons-core",
                "dynamicons"
            ]
        );
    }

    #[test]
    fn blank_template_yields_nothing() {
        assert!(ExecutionAction::from_template("   ", "p", "n").is_none());
    }

    #[test]
    fn command_line_joins_program_and_args() {
        let action = ExecutionAction::nx(vec!["build".to_string(), "@fux/a".to_string()])
            .with_args(["--skip-nx-cache".to_string()]);
        assert_eq!(action.to_string(), "nx build @fux/a --skip-nx-cache");
    }
}
