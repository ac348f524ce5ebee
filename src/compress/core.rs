use crate::direction::is_movement;

/// Joins commands inside path segments and in the compressed output.
pub const COMMAND_SEPARATOR: char = ';';

/// Compress path segments into one command string.
///
/// Segments may themselves hold `;`-joined commands (door labels, custom
/// exits). Consecutive movement tokens collapse into runs such as
/// `run 3n 2e`; a movement group that renders as a single character is
/// emitted bare. Everything else passes through untouched, in order.
pub fn assemble<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut movement: Vec<&str> = Vec::new();

    for token in segments
        .iter()
        .flat_map(|segment| segment.as_ref().split(COMMAND_SEPARATOR))
    {
        if is_movement(token) {
            movement.push(token);
            continue;
        }
        if !movement.is_empty() {
            out.push(runify(&movement));
            movement.clear();
        }
        out.push(token.to_string());
    }
    if !movement.is_empty() {
        out.push(runify(&movement));
    }

    out.join(&COMMAND_SEPARATOR.to_string())
}

/// Split a command string into the lines to transmit.
pub fn command_lines(commands: &str) -> Vec<String> {
    commands
        .split(COMMAND_SEPARATOR)
        .map(str::to_string)
        .collect()
}

fn runify(directions: &[&str]) -> String {
    let mut runs: Vec<String> = Vec::new();
    let mut iter = directions.iter().peekable();
    while let Some(direction) = iter.next() {
        let mut count = 1;
        while iter.peek() == Some(&direction) {
            iter.next();
            count += 1;
        }
        if count == 1 {
            runs.push(direction.to_string());
        } else {
            runs.push(format!("{count}{direction}"));
        }
    }

    let rendered = runs.join(" ");
    if rendered.chars().count() == 1 {
        rendered
    } else {
        format!("run {rendered}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_directions_collapse() {
        assert_eq!(assemble(&["n", "n", "n", "e", "e"]), "run 3n 2e");
    }

    #[test]
    fn single_character_hop_has_no_prefix() {
        assert_eq!(assemble(&["n"]), "n");
        assert_eq!(assemble(&["u"]), "u");
    }

    #[test]
    fn two_letter_single_hop_still_gets_prefix() {
        assert_eq!(assemble(&["ne"]), "run ne");
    }

    #[test]
    fn differing_directions_stay_separate_tokens() {
        assert_eq!(assemble(&["n", "e", "n"]), "run n e n");
    }

    #[test]
    fn other_commands_pass_through_in_order() {
        assert_eq!(assemble(&["look"]), "look");
        assert_eq!(assemble(&["n", "n", "look", "s"]), "run 2n;look;s");
        assert_eq!(assemble(&["look", "e", "e", "say hi"]), "look;run 2e;say hi");
    }

    #[test]
    fn compound_segments_are_flattened() {
        assert_eq!(assemble(&["e", "open door s;s", "s"]), "e;open door s;run 2s");
    }

    #[test]
    fn already_compressed_input_is_unchanged() {
        let once = assemble(&["n", "n", "look", "w", "w", "w"]);
        assert_eq!(once, "run 2n;look;run 3w");
        assert_eq!(assemble(&[once.as_str()]), once);
    }

    #[test]
    fn empty_input_is_empty_output() {
        let none: [&str; 0] = [];
        assert_eq!(assemble(&none), "");
    }

    #[test]
    fn command_lines_split_on_separator() {
        assert_eq!(command_lines("run 2n;look"), vec!["run 2n", "look"]);
    }
}
