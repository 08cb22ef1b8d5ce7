//! Minimal `.netrc` reader.
//!
//! Supports `machine`, `default`, `login`, `password`, `account` and skips
//! `macdef` bodies. Comments start with `#`.

use std::path::Path;

use thiserror::Error;

/// Credentials recorded for one host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetrcEntry {
    /// `login` token.
    pub login: Option<String>,
    /// `password` token.
    pub password: Option<String>,
    /// `account` token.
    pub account: Option<String>,
}

/// A parsed `.netrc` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Netrc {
    machines: Vec<(String, NetrcEntry)>,
    default: Option<NetrcEntry>,
}

/// Syntax error in a `.netrc` file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct NetrcSyntaxError {
    /// 1-based line number.
    pub line: usize,
    /// What went wrong.
    pub reason: String,
}

enum Target {
    None,
    Machine(usize),
    Default,
}

impl Netrc {
    /// Parse file contents.
    pub fn parse(contents: &str) -> Result<Self, NetrcSyntaxError> {
        let mut netrc = Netrc::default();
        let mut target = Target::None;
        let mut in_macdef = false;

        for (index, line) in contents.lines().enumerate() {
            let line_no = index + 1;
            if in_macdef {
                if line.trim().is_empty() {
                    in_macdef = false;
                }
                continue;
            }
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            while let Some(token) = tokens.next() {
                let mut value = |name: &str| {
                    tokens.next().map(ToOwned::to_owned).ok_or_else(|| NetrcSyntaxError {
                        line: line_no,
                        reason: format!("expected a value after '{name}'"),
                    })
                };
                match token {
                    "machine" => {
                        let host = value(token)?;
                        netrc.machines.push((host, NetrcEntry::default()));
                        target = Target::Machine(netrc.machines.len() - 1);
                    }
                    "default" => {
                        netrc.default = Some(NetrcEntry::default());
                        target = Target::Default;
                    }
                    "login" | "password" | "account" => {
                        let v = value(token)?;
                        let entry = match target {
                            Target::Machine(i) => &mut netrc.machines[i].1,
                            Target::Default => netrc.default.get_or_insert_with(NetrcEntry::default),
                            Target::None => {
                                return Err(NetrcSyntaxError {
                                    line: line_no,
                                    reason: format!("'{token}' before any 'machine' or 'default'"),
                                })
                            }
                        };
                        match token {
                            "login" => entry.login = Some(v),
                            "password" => entry.password = Some(v),
                            _ => entry.account = Some(v),
                        }
                    }
                    "macdef" => {
                        in_macdef = true;
                        break;
                    }
                    other => {
                        return Err(NetrcSyntaxError {
                            line: line_no,
                            reason: format!("unexpected token '{other}'"),
                        })
                    }
                }
            }
        }

        Ok(netrc)
    }

    /// Read and parse a file.
    pub fn read(path: &Path) -> Result<Self, super::CredentialsWarning> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            super::CredentialsWarning::Unreadable {
                path: path.to_path_buf(),
                source: std::sync::Arc::new(source),
            }
        })?;
        Self::parse(&contents).map_err(|source| super::CredentialsWarning::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The entry for `host`, falling back to the `default` entry.
    pub fn get(&self, host: &str) -> Option<&NetrcEntry> {
        self.machines
            .iter()
            .find(|(machine, _)| machine == host)
            .map(|(_, entry)| entry)
            .or(self.default.as_ref())
    }
}
