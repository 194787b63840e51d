use crate::store::Exits;

/// Words that may precede a direction ("go north", "walk e").
const MOVE_VERBS: [&str; 3] = ["go", "move", "walk"];

/// Direction words understood even where the room has no such exit.
const COMPASS: [&str; 6] = ["north", "south", "east", "west", "up", "down"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectionMatch {
    None,
    Unique(String),
    Ambiguous(Vec<String>),
}

/// Finds which exit of `exits` the command names.
///
/// Whole-token matches win; single-character tokens are then tried as
/// abbreviations of a direction's first letter. Comparison ignores ASCII case.
/// The returned direction is the key as stored in `exits`.
pub fn match_direction(cmd: &str, exits: &Exits) -> DirectionMatch {
    let tokens: Vec<String> = cmd.split_whitespace().map(|t| t.to_lowercase()).collect();

    if tokens.is_empty() || exits.is_empty() {
        return DirectionMatch::None;
    }

    // 1) Exact whole-token matches anywhere in the command
    let matches: Vec<&String> = exits
        .keys()
        .filter(|dir| tokens.iter().any(|tok| dir.eq_ignore_ascii_case(tok)))
        .collect();

    if !matches.is_empty() {
        return collapse(matches);
    }

    // 2) Abbreviations: only tokens that are EXACTLY one character
    let abbrev_chars: Vec<char> = tokens
        .iter()
        .filter_map(|t| {
            let mut it = t.chars();
            let c = it.next()?;
            if it.next().is_some() { None } else { Some(c) }
        })
        .collect();

    if abbrev_chars.is_empty() {
        return DirectionMatch::None;
    }

    let abbrev_matches: Vec<&String> = exits
        .keys()
        .filter(|dir| {
            dir.chars()
                .next()
                .map(|c| abbrev_chars.iter().any(|ac| ac.eq_ignore_ascii_case(&c)))
                .unwrap_or(false)
        })
        .collect();

    collapse(abbrev_matches)
}

fn collapse(mut matches: Vec<&String>) -> DirectionMatch {
    match matches.len() {
        0 => DirectionMatch::None,
        1 => DirectionMatch::Unique(matches[0].clone()),
        _ => {
            matches.sort();
            DirectionMatch::Ambiguous(matches.into_iter().cloned().collect())
        }
    }
}

/// `"go north"` -> `Some("north")`; `None` when no movement verb leads.
pub fn strip_move_verb(cmd: &str) -> Option<&str> {
    let cmd = cmd.trim();
    let (verb, rest) = cmd.split_once(char::is_whitespace)?;
    if MOVE_VERBS.iter().any(|v| v.eq_ignore_ascii_case(verb)) {
        Some(rest.trim())
    } else {
        None
    }
}

/// `"n"` / `"North"` -> `Some("north")` when the command opens with a
/// compass word or its first letter.
pub fn compass_direction(cmd: &str) -> Option<&'static str> {
    let first = cmd.split_whitespace().next()?.to_lowercase();
    COMPASS
        .into_iter()
        .find(|dir| *dir == first || (first.len() == 1 && dir.starts_with(&first)))
}

/// Looks up `direction` case-insensitively among `exits`.
pub fn resolve_exit<'a>(exits: &'a Exits, direction: &str) -> Option<&'a String> {
    let wanted = direction.trim().to_lowercase();
    exits.get(&wanted).or_else(|| {
        exits
            .iter()
            .find(|(dir, _)| dir.eq_ignore_ascii_case(&wanted))
            .map(|(_, to)| to)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exits(pairs: &[(&str, &str)]) -> Exits {
        pairs
            .iter()
            .map(|(d, r)| (d.to_string(), r.to_string()))
            .collect()
    }

    #[test]
    fn whole_word_anywhere_in_command() {
        let e = exits(&[("north", "a"), ("east", "b")]);
        assert_eq!(match_direction("go NORTH please", &e), DirectionMatch::Unique("north".into()));
        assert_eq!(match_direction("east", &e), DirectionMatch::Unique("east".into()));
        assert_eq!(match_direction("dance", &e), DirectionMatch::None);
    }

    #[test]
    fn single_letter_abbreviation() {
        let e = exits(&[("north", "a"), ("east", "b")]);
        assert_eq!(match_direction("e", &e), DirectionMatch::Unique("east".into()));
        assert_eq!(match_direction("go n", &e), DirectionMatch::Unique("north".into()));
        assert_eq!(match_direction("w", &e), DirectionMatch::None);
    }

    #[test]
    fn shared_initial_is_ambiguous() {
        let e = exits(&[("south", "a"), ("stairs", "b"), ("east", "c")]);
        assert_eq!(
            match_direction("s", &e),
            DirectionMatch::Ambiguous(vec!["south".into(), "stairs".into()])
        );
    }

    #[test]
    fn no_exits_never_match() {
        assert_eq!(match_direction("north", &Exits::new()), DirectionMatch::None);
    }

    #[test]
    fn compass_words_and_letters_are_recognised() {
        assert_eq!(compass_direction("north"), Some("north"));
        assert_eq!(compass_direction("N"), Some("north"));
        assert_eq!(compass_direction("d please"), Some("down"));
        assert_eq!(compass_direction("northwest"), None);
        assert_eq!(compass_direction("x"), None);
        assert_eq!(compass_direction("dance"), None);
        assert_eq!(compass_direction(""), None);
    }

    #[test]
    fn move_verbs_are_stripped() {
        assert_eq!(strip_move_verb("go  up"), Some("up"));
        assert_eq!(strip_move_verb("Walk sideways"), Some("sideways"));
        assert_eq!(strip_move_verb("look around"), None);
        assert_eq!(strip_move_verb("go"), None);
    }

    #[test]
    fn resolve_exit_ignores_case() {
        let e = exits(&[("East", "kitchen")]);
        assert_eq!(resolve_exit(&e, "east").map(String::as_str), Some("kitchen"));
        assert_eq!(resolve_exit(&e, " EAST "), Some(&"kitchen".to_string()));
        assert_eq!(resolve_exit(&e, "west"), None);
    }
}
