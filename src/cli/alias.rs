use std::collections::BTreeMap;

use tracing::debug;

/// Replace an alias in the subcommand position with its definition.
///
/// `$1`..`$9` in the definition take the arguments given after the alias
/// name; arguments that no placeholder consumed are appended. A placeholder
/// with no matching argument is dropped. Built-in commands always win over
/// aliases of the same name.
pub fn expand(args: Vec<String>, aliases: &BTreeMap<String, Vec<String>>, builtins: &[&str]) -> Vec<String> {
    let Some(name) = args.get(1) else {
        return args;
    };
    if builtins.contains(&name.as_str()) {
        return args;
    }
    let Some(definition) = aliases.get(name) else {
        return args;
    };

    let rest = &args[2..];
    let mut used = vec![false; rest.len()];
    let mut expanded = vec![args[0].clone()];

    for token in definition {
        let mut out = String::new();
        let mut chars = token.chars().peekable();
        let mut only_placeholders = true;
        let mut any_missing = false;
        while let Some(c) = chars.next() {
            let digit = match (c, chars.peek()) {
                ('$', Some(d)) if ('1'..='9').contains(d) => *d,
                _ => {
                    out.push(c);
                    only_placeholders = false;
                    continue;
                }
            };
            chars.next();
            let idx = digit as usize - '1' as usize;
            match rest.get(idx) {
                Some(arg) => {
                    out.push_str(arg);
                    used[idx] = true;
                }
                None => any_missing = true,
            }
        }
        if out.is_empty() && only_placeholders && any_missing {
            continue;
        }
        expanded.push(out);
    }

    expanded.extend(
        rest.iter()
            .zip(&used)
            .filter(|(_, &u)| !u)
            .map(|(arg, _)| arg.clone()),
    );
    debug!(alias = %name, ?expanded, "expanded alias");
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> BTreeMap<String, Vec<String>> {
        let mut m = BTreeMap::new();
        m.insert(
            "quarter".to_string(),
            vec!["show".into(), "$1-q$2".into(), "--summary".into()],
        );
        m.insert("gas".to_string(), vec!["show".into(), "Gas".into(), "--method".into(), "$1".into()]);
        m.insert("show".to_string(), vec!["lint".into()]);
        m
    }

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    const BUILTINS: &[&str] = &["lint", "show"];

    #[test]
    fn test_positional_substitution() {
        let out = expand(argv(&["purse", "quarter", "2025", "3"]), &aliases(), BUILTINS);
        assert_eq!(out, argv(&["purse", "show", "2025-q3", "--summary"]));
    }

    #[test]
    fn test_leftover_arguments_are_appended() {
        let out = expand(
            argv(&["purse", "gas", "FreedomCard", "--sort", "amount-"]),
            &aliases(),
            BUILTINS,
        );
        assert_eq!(
            out,
            argv(&["purse", "show", "Gas", "--method", "FreedomCard", "--sort", "amount-"])
        );
    }

    #[test]
    fn test_missing_placeholder_is_dropped() {
        let out = expand(argv(&["purse", "gas"]), &aliases(), BUILTINS);
        assert_eq!(out, argv(&["purse", "show", "Gas", "--method"]));
    }

    #[test]
    fn test_builtins_and_unknown_names_pass_through() {
        let args = argv(&["purse", "show", "--raw"]);
        assert_eq!(expand(args.clone(), &aliases(), BUILTINS), args);
        let args = argv(&["purse", "nope"]);
        assert_eq!(expand(args.clone(), &aliases(), BUILTINS), args);
        assert_eq!(expand(argv(&["purse"]), &aliases(), BUILTINS), argv(&["purse"]));
    }
}
