//! Plain-text tree rendering of Kinds

use crate::conditional::ConditionalKind;
use crate::config::DisplayConfig;
use crate::kind::Kind;
use std::fmt;

impl fmt::Display for Kind {
    /// Draws the canonical branches as a tree rooted at `<>`
    ///
    /// ```text
    ///     ,---- 1/4 ---- <0>
    /// <> -+---- 1/2 ---- <1>
    ///     `---- 1/4 ---- <2>
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let branches = self.branches();
        if branches.is_empty() {
            return write!(f, "<> -+");
        }

        let weights: Vec<String> = branches.iter().map(|b| format!(" {} ", b.weight)).collect();
        let values: Vec<String> = branches.iter().map(|b| b.value.to_string()).collect();
        let width = weights.iter().map(|w| w.chars().count()).max().unwrap_or(0);

        let size = branches.len();
        if size == 1 {
            return write!(f, "<> ------{:-<width$}---- {}", weights[0], values[0]);
        }

        let juncture = size / 2;
        let even = size % 2 == 0;
        let mut lines = Vec::with_capacity(size + 1);
        for (i, (w, v)) in weights.iter().zip(values.iter()).enumerate() {
            let edge = format!("----{w:-<width$}---- {v}");
            if i == 0 {
                lines.push(format!("    ,{edge}"));
                if size == 2 {
                    lines.push("<> -|".to_string());
                }
            } else if i == size - 1 {
                lines.push(format!("    `{edge}"));
            } else if i == juncture {
                if even {
                    lines.push("<> -|".to_string());
                    lines.push(format!("    |{edge}"));
                } else {
                    lines.push(format!("<> -+{edge}"));
                }
            } else {
                lines.push(format!("    |{edge}"));
            }
        }
        write!(f, "{}", lines.join("\n"))
    }
}

impl Kind {
    pub fn render(&self, config: &DisplayConfig) -> String {
        frame(&self.to_string(), config)
    }
}

impl ConditionalKind {
    pub fn render(&self, config: &DisplayConfig) -> String {
        frame(&self.to_string(), config)
    }
}

/// Surround `text` with a square box unless output is restricted to ASCII
fn frame(text: &str, config: &DisplayConfig) -> String {
    if config.ascii_only {
        return text.to_string();
    }
    let width = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let rule = "─".repeat(width + 2);
    let mut out = format!("┌{rule}┐\n");
    for line in text.lines() {
        let pad = width - line.chars().count();
        out.push_str(&format!("│ {line}{} │\n", " ".repeat(pad)));
    }
    out.push_str(&format!("└{rule}┘"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{constant, either, uniform};
    use crate::value::Value;

    #[test]
    fn single_branch() {
        assert_eq!(constant(3).to_string(), "<> ------ 1 ---- <3>");
        assert_eq!(Kind::empty().to_string(), "<> -+");
    }

    #[test]
    fn two_branches() {
        let text = either(0, 1, 1).unwrap().to_string();
        assert_eq!(
            text,
            "    ,---- 1/2 ---- <0>\n<> -|\n    `---- 1/2 ---- <1>"
        );
    }

    #[test]
    fn odd_sizes_branch_from_the_middle() {
        let k = uniform((0..3).map(Value::from)).unwrap();
        assert_eq!(
            k.to_string(),
            "    ,---- 1/3 ---- <0>\n<> -+---- 1/3 ---- <1>\n    `---- 1/3 ---- <2>"
        );
    }

    #[test]
    fn weights_are_padded_to_a_common_width() {
        let k = crate::builders::weighted_as([0, 1, 2, 3], [1, 1, 1, 7]).unwrap();
        let text = k.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], "<> -|");
        assert_eq!(lines[0], "    ,---- 1/10 ---- <0>");
        assert_eq!(lines[4], "    `---- 7/10 ---- <3>");
    }

    #[test]
    fn boxed_rendering() {
        let k = constant(1);
        assert_eq!(k.render(&DisplayConfig { ascii_only: true }), k.to_string());
        let boxed = k.render(&DisplayConfig { ascii_only: false });
        let lines: Vec<&str> = boxed.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with('┌'));
        assert_eq!(lines[1], "│ <> ------ 1 ---- <1> │");
    }
}
