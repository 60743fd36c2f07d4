//! Where credentials come from.
//!
//! A run reads credentials from exactly one place: the INI credentials file
//! or an interactive prompt, chosen by the execution mode. Callers that
//! already hold a bundle can skip both.

use std::fmt;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption, Properties};
use tracing::debug;

use super::credentials::{CredentialBundle, NO_TWO_FACTOR};
use super::prompt::{Prompter, TerminalPrompter};
use super::AuthError;
use crate::config::Settings;

/// INI section holding the Reddit credentials
pub const SECTION: &str = "reddit";

pub enum CredentialSource {
    File(FileSource),
    Interactive(InteractiveSource),
    Provided(CredentialBundle),
}

impl CredentialSource {
    /// Pick the source matching the configured execution mode
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.interactive {
            CredentialSource::Interactive(InteractiveSource::terminal())
        } else {
            CredentialSource::File(FileSource::new(&settings.credentials_path))
        }
    }

    pub fn resolve(&mut self) -> Result<CredentialBundle, AuthError> {
        debug!(source = %self, "Resolving credentials");
        match self {
            CredentialSource::File(source) => source.resolve(),
            CredentialSource::Interactive(source) => source.resolve(),
            CredentialSource::Provided(bundle) => Ok(bundle.clone()),
        }
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::File(source) => write!(f, "file {}", source.path().display()),
            CredentialSource::Interactive(_) => write!(f, "interactive prompt"),
            CredentialSource::Provided(_) => write!(f, "provided"),
        }
    }
}

/// Credentials stored in the `[reddit]` section of an INI file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn resolve(&self) -> Result<CredentialBundle, AuthError> {
        if !self.path.exists() {
            return Err(AuthError::MissingSource(self.path.clone()));
        }

        // Values are taken verbatim so passwords with quotes or backslashes survive
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_file_opt(&self.path, options)
            .map_err(|e| self.invalid(e.to_string()))?;

        let section = ini
            .section(Some(SECTION))
            .ok_or_else(|| self.invalid(format!("missing [{}] section", SECTION)))?;

        let required = |key: &str| {
            option(section, key)
                .map(str::to_string)
                .ok_or_else(|| self.invalid(format!("missing key '{}' in [{}]", key, SECTION)))
        };

        Ok(CredentialBundle {
            client_id: required("client_id")?,
            client_secret: required("client_secret")?,
            username: required("username")?,
            password: required("password")?,
            two_factor_code: option(section, "two_factor_code")
                .unwrap_or(NO_TWO_FACTOR)
                .to_string(),
        })
    }

    fn invalid(&self, reason: String) -> AuthError {
        AuthError::InvalidSource {
            path: self.path.clone(),
            reason,
        }
    }
}

/// Look up a key ignoring ASCII case, so `Client_ID` matches `client_id`
fn option<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
}

/// Credentials typed in by the user.
pub struct InteractiveSource {
    prompter: Box<dyn Prompter + Send>,
}

impl InteractiveSource {
    pub fn terminal() -> Self {
        Self::with_prompter(TerminalPrompter)
    }

    pub fn with_prompter(prompter: impl Prompter + Send + 'static) -> Self {
        Self {
            prompter: Box::new(prompter),
        }
    }

    /// Ask for each field in turn. A skipped or closed field falls back to
    /// its default: empty for required fields, "None" for the second factor.
    pub fn resolve(&mut self) -> Result<CredentialBundle, AuthError> {
        let prompter = self.prompter.as_mut();
        prompter.announce("Reddit API Credentials")?;

        let client_id = prompter.ask("Client ID", None)?.unwrap_or_default();
        let client_secret = prompter.ask_secret("Client Secret")?.unwrap_or_default();
        let username = prompter.ask("Username", None)?.unwrap_or_default();
        let password = prompter.ask_secret("Password")?.unwrap_or_default();
        let two_factor_code = prompter
            .ask("Two-Factor Code (optional)", Some(NO_TWO_FACTOR))?
            .filter(|code| !code.trim().is_empty())
            .unwrap_or_else(|| NO_TWO_FACTOR.to_string());

        Ok(CredentialBundle {
            client_id,
            client_secret,
            username,
            password,
            two_factor_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::{self, Write};

    use tempfile::NamedTempFile;

    use super::*;

    /// Replays canned answers; `None` simulates a closed input
    struct ScriptedPrompter {
        answers: VecDeque<Option<&'static str>>,
    }

    impl ScriptedPrompter {
        fn new(answers: &[Option<&'static str>]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
            }
        }

        fn next(&mut self) -> io::Result<Option<String>> {
            Ok(self.answers.pop_front().flatten().map(str::to_string))
        }
    }

    impl Prompter for ScriptedPrompter {
        fn ask(&mut self, _label: &str, _default: Option<&str>) -> io::Result<Option<String>> {
            self.next()
        }

        fn ask_secret(&mut self, _label: &str) -> io::Result<Option<String>> {
            self.next()
        }
    }

    fn write_ini(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn test_file_source_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("reddit_credentials.ini");

        let err = FileSource::new(&path).resolve().unwrap_err();
        assert!(matches!(err, AuthError::MissingSource(ref p) if p == &path));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_file_source_reads_all_fields() {
        let file = write_ini(
            "[reddit]\nclient_id = abc\nclient_secret = def\nusername = spez\npassword = p\\ss\"word\ntwo_factor_code = 123 456\n",
        );

        let creds = FileSource::new(file.path()).resolve().expect("credentials");
        assert_eq!(creds.client_id, "abc");
        assert_eq!(creds.client_secret, "def");
        assert_eq!(creds.username, "spez");
        assert_eq!(creds.password, "p\\ss\"word");
        assert_eq!(creds.two_factor_code, "123 456");
        assert_eq!(creds.login_password(), "p\\ss\"word:123456");
    }

    #[test]
    fn test_file_source_defaults_two_factor() {
        let file = write_ini(
            "[reddit]\nclient_id = abc\nclient_secret = def\nusername = spez\npassword = hunter2\n",
        );

        let creds = FileSource::new(file.path()).resolve().expect("credentials");
        assert_eq!(creds.two_factor_code, "None");
        assert_eq!(creds.login_password(), "hunter2");
    }

    #[test]
    fn test_file_source_keys_ignore_case() {
        let file = write_ini(
            "[reddit]\nClient_ID = abc\nCLIENT_SECRET = def\nUserName = spez\nPassword = hunter2\nTwo_Factor_Code = 42\n",
        );

        let creds = FileSource::new(file.path()).resolve().expect("credentials");
        assert_eq!(creds.client_id, "abc");
        assert_eq!(creds.client_secret, "def");
        assert_eq!(creds.username, "spez");
        assert_eq!(creds.login_password(), "hunter2:42");
    }

    #[test]
    fn test_file_source_missing_section() {
        let file = write_ini("[other]\nclient_id = abc\n");

        let err = FileSource::new(file.path()).resolve().unwrap_err();
        assert!(matches!(err, AuthError::InvalidSource { ref reason, .. } if reason.contains("[reddit]")));
    }

    #[test]
    fn test_file_source_missing_key() {
        let file = write_ini("[reddit]\nclient_id = abc\nclient_secret = def\nusername = spez\n");

        let err = FileSource::new(file.path()).resolve().unwrap_err();
        assert!(matches!(err, AuthError::InvalidSource { ref reason, .. } if reason.contains("'password'")));
    }

    #[test]
    fn test_interactive_source_collects_fields() {
        let prompter = ScriptedPrompter::new(&[
            Some("abc"),
            Some("def"),
            Some("spez"),
            Some("hunter2"),
            Some(" 123 456 "),
        ]);
        let mut source = InteractiveSource::with_prompter(prompter);

        let creds = source.resolve().expect("credentials");
        assert_eq!(creds.client_id, "abc");
        assert_eq!(creds.client_secret, "def");
        assert_eq!(creds.username, "spez");
        assert_eq!(creds.password, "hunter2");
        assert_eq!(creds.login_password(), "hunter2:123456");
    }

    #[test]
    fn test_interactive_source_blank_two_factor_uses_default() {
        let prompter = ScriptedPrompter::new(&[
            Some("abc"),
            Some("def"),
            Some("spez"),
            Some("hunter2"),
            Some(""),
        ]);
        let creds = InteractiveSource::with_prompter(prompter)
            .resolve()
            .expect("credentials");
        assert_eq!(creds.two_factor_code, "None");
    }

    #[test]
    fn test_interactive_source_closed_input() {
        let prompter = ScriptedPrompter::new(&[Some("abc"), None, None, None, None]);
        let creds = InteractiveSource::with_prompter(prompter)
            .resolve()
            .expect("credentials");

        assert_eq!(creds.client_id, "abc");
        assert_eq!(creds.client_secret, "");
        assert_eq!(creds.two_factor_code, "None");
        assert!(matches!(
            creds.validate(),
            Err(AuthError::IncompleteCredentials("client_secret"))
        ));
    }

    #[test]
    fn test_provided_source_skips_reading() {
        let bundle = CredentialBundle::new("abc", "def", "spez", "hunter2");
        let mut source = CredentialSource::Provided(bundle.clone());
        assert_eq!(source.resolve().expect("credentials"), bundle);
    }

    #[test]
    fn test_from_settings_selects_source() {
        let file_settings = Settings::default();
        assert!(matches!(
            CredentialSource::from_settings(&file_settings),
            CredentialSource::File(ref f) if f.path() == file_settings.credentials_path
        ));

        let interactive = Settings {
            interactive: true,
            ..Settings::default()
        };
        assert!(matches!(
            CredentialSource::from_settings(&interactive),
            CredentialSource::Interactive(_)
        ));
    }
}
