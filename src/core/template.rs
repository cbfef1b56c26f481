//! Output naming template
//!
//! Artifact names are produced from a template in Go's text/template
//! syntax, restricted to the three fields a build knows about:
//! `{{.Dir}}`, `{{.OS}}` and `{{.Arch}}`. Templates are parsed once, up
//! front, so a malformed template fails the run before any job starts.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::platform::Platform;
use crate::error::ConfigError;

fn action_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(.*?)\}\}").expect("valid action regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Dir,
    Os,
    Arch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed output naming template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    segments: Vec<Segment>,
}

impl OutputTemplate {
    /// Parse a template, rejecting unknown fields and unterminated actions
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidTemplate {
            template: source.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut last = 0;

        for caps in action_regex().captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_literal(&mut segments, &source[last..whole.start()])
                .map_err(|()| invalid("unterminated action".to_string()))?;

            let action = caps[1].trim();
            let field = match action {
                ".Dir" => Field::Dir,
                ".OS" => Field::Os,
                ".Arch" => Field::Arch,
                "" => return Err(invalid("empty action".to_string())),
                other => {
                    return Err(invalid(format!(
                        "unknown field '{other}' (expected .Dir, .OS or .Arch)"
                    )))
                }
            };
            segments.push(Segment::Field(field));
            last = whole.end();
        }

        push_literal(&mut segments, &source[last..])
            .map_err(|()| invalid("unterminated action".to_string()))?;

        Ok(Self { segments })
    }

    /// Render the artifact name for a package directory and platform
    pub fn render(&self, dir: &str, platform: &Platform) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Field(Field::Dir) => dir,
                Segment::Field(Field::Os) => platform.os.as_str(),
                Segment::Field(Field::Arch) => platform.arch.as_str(),
            })
            .collect()
    }
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) -> Result<(), ()> {
    if text.contains("{{") {
        return Err(());
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}
