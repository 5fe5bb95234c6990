use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppResult;

const PROFILE_SECTION_PREFIX: &str = "profile ";
const SSO_SESSION_SECTION_PREFIX: &str = "sso-session ";
const DEFAULT_PROFILE: &str = "default";

/// Line-preserving view of the AWS shared config file. Sections are located
/// by scanning the raw lines, so comments, ordering, and content this tool
/// does not understand survive a rewrite untouched.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::parse(path.to_path_buf(), ""));
        }

        let raw = fs::read_to_string(path)?;
        Ok(Self::parse(path.to_path_buf(), &raw))
    }

    pub fn parse(path: PathBuf, contents: &str) -> Self {
        let lines = contents.lines().map(ToOwned::to_owned).collect();
        Self { path, lines }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Section name for a named profile, `default` being the one bare
    /// section the config format allows.
    pub fn profile_section(name: &str) -> String {
        if name == DEFAULT_PROFILE {
            DEFAULT_PROFILE.to_string()
        } else {
            format!("{PROFILE_SECTION_PREFIX}{name}")
        }
    }

    pub fn sso_session_section(name: &str) -> String {
        format!("{SSO_SESSION_SECTION_PREFIX}{name}")
    }

    /// All profile sections as name -> key/value map. Lines outside any
    /// section and sections of other kinds are skipped, not errors.
    pub fn profiles(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.sections_with(|section| {
            if section == DEFAULT_PROFILE {
                Some(DEFAULT_PROFILE.to_string())
            } else {
                section
                    .strip_prefix(PROFILE_SECTION_PREFIX)
                    .map(|name| name.trim().to_string())
            }
        })
    }

    pub fn sso_sessions(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.sections_with(|section| {
            section
                .strip_prefix(SSO_SESSION_SECTION_PREFIX)
                .map(|name| name.trim().to_string())
        })
    }

    fn sections_with(
        &self,
        mut name_of: impl FnMut(&str) -> Option<String>,
    ) -> BTreeMap<String, BTreeMap<String, String>> {
        let mut sections = BTreeMap::new();
        let mut current: Option<String> = None;

        for line in &self.lines {
            if let Some(header) = parse_section_header(line) {
                current = name_of(header);
                if let Some(name) = &current {
                    sections.entry(name.clone()).or_insert_with(BTreeMap::new);
                }
                continue;
            }

            if let (Some(name), Some((key, value))) = (&current, parse_key_value(line)) {
                if let Some(values) = sections.get_mut(name) {
                    values.insert(key.to_string(), value.to_string());
                }
            }
        }

        sections
    }

    /// Update or append the given keys within a section, creating the
    /// section at the end of the file when it does not exist. Existing key
    /// lines are rewritten in place; new keys land after the section's last
    /// non-blank line.
    pub fn upsert_section(&mut self, section: &str, values: &[(&str, String)]) {
        if self.section_range(section).is_none() {
            if self
                .lines
                .last()
                .is_some_and(|line| !line.trim().is_empty())
            {
                self.lines.push(String::new());
            }
            self.lines.push(format!("[{section}]"));
        }

        for (key, value) in values {
            let Some((start, end)) = self.section_range(section) else {
                return;
            };
            let formatted = format!("{key} = {value}");

            let existing = (start + 1..end)
                .find(|idx| parse_key_value(&self.lines[*idx]).is_some_and(|(k, _)| k == *key));

            match existing {
                Some(idx) => self.lines[idx] = formatted,
                None => {
                    let mut insert_at = end;
                    while insert_at > start + 1 && self.lines[insert_at - 1].trim().is_empty() {
                        insert_at -= 1;
                    }
                    self.lines.insert(insert_at, formatted);
                }
            }
        }
    }

    pub fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut payload = self.lines.join("\n");
        payload.push('\n');
        fs::write(&self.path, payload)?;
        Ok(())
    }

    fn section_range(&self, section: &str) -> Option<(usize, usize)> {
        let start = self
            .lines
            .iter()
            .position(|line| parse_section_header(line) == Some(section))?;
        let end = self.lines[start + 1..]
            .iter()
            .position(|line| parse_section_header(line).is_some())
            .map(|offset| start + 1 + offset)
            .unwrap_or(self.lines.len());
        Some((start, end))
    }
}

fn parse_section_header(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
        return None;
    }

    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key, value.trim()))
}
