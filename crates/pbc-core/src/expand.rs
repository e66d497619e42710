//! Argument rewriting: target shortcuts, short-flag bundles and "full"
//! target variants.
//!
//! Every function here is pure and keeps the relative order of its input.

use std::collections::BTreeMap;

/// Targets rewritten when a package is configured with `full: true`.
const FULL_TARGETS: &[(&str, &str)] = &[
    ("lint", "lint:full"),
    ("test", "test:full"),
    ("validate", "validate:full"),
    ("l", "lint:full"),
];

/// Replaces a shortcut in `args[0]` with the whitespace-separated words it
/// maps to. An exact key wins; otherwise lookup ignores ASCII case.
pub fn expand_target_shortcuts(args: &[String], targets: &BTreeMap<String, String>) -> Vec<String> {
    let Some((first, rest)) = args.split_first() else {
        return Vec::new();
    };

    let mapped = targets.get(first).or_else(|| {
        targets
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(first))
            .map(|(_, value)| value)
    });

    match mapped {
        Some(value) => value
            .split_whitespace()
            .map(ToOwned::to_owned)
            .chain(rest.iter().cloned())
            .collect(),
        None => args.to_vec(),
    }
}

/// Expands single-dash flags using `expandables`.
///
/// `-stream` is first looked up as a whole; failing that, each character
/// of the bundle is expanded on its own and unmapped characters are kept
/// as `-<c>`.
pub fn expand_flags(args: &[String], expandables: &BTreeMap<String, String>) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());

    for arg in args {
        let Some(body) = short_flag_body(arg) else {
            out.push(arg.clone());
            continue;
        };

        if let Some((key, value)) = body.split_once('=') {
            match expandables.get(key) {
                Some(long) => out.push(format!("{}={}", long_flag(long), value)),
                None => out.push(arg.clone()),
            }
            continue;
        }

        if let Some(long) = expandables.get(body) {
            out.push(long_flag(long));
            continue;
        }

        for c in body.chars() {
            let mut key = [0u8; 4];
            match expandables.get(&*c.encode_utf8(&mut key)) {
                Some(long) => out.push(long_flag(long)),
                None => out.push(format!("-{c}")),
            }
        }
    }

    out
}

/// Maps `lint`, `test`, `validate` and `l` to their `:full` variants when
/// `is_full` is set. Anything else is returned as is.
pub fn normalize_full_semantics(is_full: bool, target: &str) -> String {
    if !is_full {
        return target.to_string();
    }
    FULL_TARGETS
        .iter()
        .find(|(short, _)| *short == target)
        .map(|(_, full)| (*full).to_string())
        .unwrap_or_else(|| target.to_string())
}

/// Returns the part after `-` for tokens shaped like `-x...`, `None` for
/// long flags and plain words.
fn short_flag_body(arg: &str) -> Option<&str> {
    if arg.starts_with("--") {
        return None;
    }
    arg.strip_prefix('-').filter(|body| !body.is_empty())
}

fn long_flag(name: &str) -> String {
    if name.starts_with("--") {
        name.to_string()
    } else {
        format!("--{name}")
    }
}
