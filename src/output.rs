//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Project, Snippet, SshKey, User};

/// Trait for human-readable key-value output.
///
/// Implemented by model types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let header = self.slug().unwrap_or(self.name.as_str()).to_string();
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            format!("Project: {header}"),
            divider,
            format!("ID:             {}", self.id),
            format!("Name:           {}", self.name),
            format!("Visibility:     {}", self.visibility()),
        ];

        if let Some(ref branch) = self.default_branch {
            lines.push(format!("Default Branch: {branch}"));
        }

        if let Some(ref description) = self.description {
            if !description.is_empty() {
                lines.push(format!("Description:    {description}"));
            }
        }

        if let Some(ref url) = self.web_url {
            lines.push(format!("URL:            {url}"));
        }

        if let Some(ref active) = self.last_activity_at {
            lines.push(format!("Last Activity:  {}", active.format(TIME_FORMAT)));
        }

        if self.archived {
            lines.push("Archived:       yes".to_string());
        }

        lines.join("\n")
    }
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let header = format!("User: {}", self.username);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("ID:             {}", self.id)];

        if let Some(ref name) = self.name {
            lines.push(format!("Name:           {name}"));
        }
        if let Some(ref state) = self.state {
            lines.push(format!("State:          {state}"));
        }
        if let Some(ref email) = self.email {
            lines.push(format!("Email:          {email}"));
        }
        if let Some(ref url) = self.web_url {
            lines.push(format!("URL:            {url}"));
        }
        if self.is_admin == Some(true) {
            lines.push("Admin:          yes".to_string());
        }
        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", created.format(TIME_FORMAT)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for SshKey {
    fn pretty_print(&self) -> String {
        let header = format!("Key #{}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("Title:          {}", self.title),
            format!("Type:           {}", self.key_type().unwrap_or("unknown")),
        ];
        if let Some(ref created) = self.created_at {
            lines.push(format!("Added:          {}", created.format(TIME_FORMAT)));
        }
        lines.join("\n")
    }
}

impl PrettyPrint for Snippet {
    fn pretty_print(&self) -> String {
        let header = format!("Snippet #{}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("Title:          {}", self.title)];
        if let Some(ref file_name) = self.file_name {
            lines.push(format!("File:           {file_name}"));
        }
        if let Some(ref author) = self.author {
            lines.push(format!("Author:         {}", author.username));
        }
        if let Some(ref expires) = self.expires_at {
            lines.push(format!("Expires:        {}", expires.format(TIME_FORMAT)));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_pretty_print_format() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": 4,
            "name": "Diaspora Client",
            "path_with_namespace": "diaspora/diaspora-client",
            "public": true,
            "default_branch": "master"
        }))
        .unwrap();

        let output = project.pretty_print();
        assert!(output.starts_with("Project: diaspora/diaspora-client"));
        assert!(output.contains("Visibility:     public"));
        assert!(output.contains("Default Branch: master"));
    }

    #[test]
    fn test_user_pretty_print_hides_missing_fields() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 1,
            "username": "john_smith"
        }))
        .unwrap();

        let output = user.pretty_print();
        assert!(output.starts_with("User: john_smith"));
        assert!(!output.contains("Email:"));
    }
}
