/*
Wristwatch - Wrist Watch HUD
*/
use regex::Regex;

lazy_static::lazy_static! {
    // Indent tags break the watch's narrow layout
    static ref INDENT_PATTERN: Regex = Regex::new(r"<indent=\d{1,3}%>").unwrap();
}

/// One Line Group From the Game's Objective Panel
/// The Main Objective Shows up Here Too, as its Own Sub-Objective
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectiveProgression {
    pub header: Option<String>,
    pub text: Option<String>,
}

pub fn strip_indents(text: &str) -> String {
    INDENT_PATTERN.replace_all(text, "").into_owned()
}

/// Flattens Progressions Into the Watch's Objective Text
pub fn build_objective_text(progressions: &[ObjectiveProgression]) -> String {
    let mut out = String::new();
    for progression in progressions {
        if let Some(header) = &progression.header {
            out.push_str(&strip_indents(header));
            out.push('\n');
        }
        if let Some(text) = &progression.text {
            out.push_str(&strip_indents(text));
        }
    }
    out
}
