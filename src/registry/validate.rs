use std::io::Write;

use super::Registry;

/// A `group` attribute that names no `enums` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    #[must_use]
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// Write every issue, one per line, with a summary header.
pub fn print_issues(out: &mut dyn Write, issues: &[ValidationIssue]) -> std::io::Result<()> {
    writeln!(out, "* Group validation found {} issue(s):", issues.len())?;
    for issue in issues {
        writeln!(out, "{issue}")?;
    }
    Ok(())
}

impl Registry {
    /// Check `group` attributes on command params, protos and struct members.
    ///
    /// Every group must name an `enums` element in the registry. Issues are
    /// returned in document order; an empty list means the registry is clean.
    #[must_use]
    pub fn validate_groups(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let root = &self.document().root;

        for command in root.find_all("commands").flat_map(|c| c.find_all("command")) {
            let name = command
                .find("proto")
                .and_then(|p| p.child_text("name"))
                .or_else(|| command.attr("name").map(str::to_string))
                .unwrap_or_default();
            let grouped = command
                .find_all("proto")
                .chain(command.find_all("param"));
            for element in grouped {
                let Some(group) = element.attr("group") else {
                    continue;
                };
                if !self.has_group(group) {
                    let what = element.child_text("name").unwrap_or_else(|| element.tag.clone());
                    issues.push(ValidationIssue::new(
                        format!("command:{name}/{what}"),
                        "unknown_group",
                        format!("group '{group}' does not match any <enums> group"),
                    ));
                }
            }
        }

        for ty in root.find_all("types").flat_map(|t| t.find_all("type")) {
            let type_name = ty.attr("name").unwrap_or_default();
            for member in ty.find_all("member") {
                let Some(group) = member.attr("group") else {
                    continue;
                };
                if !self.has_group(group) {
                    let what = member.child_text("name").unwrap_or_default();
                    issues.push(ValidationIssue::new(
                        format!("type:{type_name}/{what}"),
                        "unknown_group",
                        format!("group '{group}' does not match any <enums> group"),
                    ));
                }
            }
        }

        issues
    }
}
