//! Validating a draft and, with the user's consent, making it active.

use std::{
    io::{BufRead as _, Write as _},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::{anyhow, bail, Context as _, Result};
use cdnsync_api::{
    schema::{DiffFormat, Service, Version},
    ConfigApi,
};
use tracing::debug;

pub(crate) const NON_INTERACTIVE: &str = "In non-interactive shell and --assume-yes not used.";

/// The user's side of the activation dialogue.
pub(crate) trait Terminal {
    fn is_interactive(&self) -> bool;

    /// Ask a yes/no question.
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Show a long text, through a pager if there is one.
    fn page(&mut self, title: &str, text: &str) -> Result<()>;

    fn say(&mut self, line: &str);
}

/// The real terminal: standard input and output.
pub(crate) struct Console {
    interactive: bool,
}

impl Console {
    pub(crate) fn new(interactive: bool) -> Self {
        Self { interactive }
    }
}

impl Terminal for Console {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        let stdin = std::io::stdin();
        loop {
            print!("{} (y/n): ", question);
            std::io::stdout().flush()?;
            let mut input = String::new();
            if stdin.lock().read_line(&mut input)? == 0 {
                bail!("end of input while waiting for an answer");
            }
            match input.trim() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                other => println!("Invalid input: {}", other),
            }
        }
    }

    fn page(&mut self, title: &str, text: &str) -> Result<()> {
        let Some((pager, args)) = find_pager() else {
            println!("{}\n\n{}", title, text);
            return Ok(());
        };
        debug!("showing diff with {}", pager.display());
        let mut child = Command::new(&pager)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("starting pager {}", pager.display()))?;
        if let Some(mut stdin) = child.stdin.take() {
            // The pager may be quit before reading everything.
            let _ = stdin.write_all(text.as_bytes());
        }
        child.wait()?;
        Ok(())
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// The first of `$PAGER`, `pager` and `less` found on `PATH`, with any
/// arguments given in `$PAGER`.
fn find_pager() -> Option<(PathBuf, Vec<String>)> {
    let from_env = std::env::var("PAGER").unwrap_or_default();
    let mut env_words = from_env.split_whitespace();
    let env_pager = env_words.next().map(|p| (p.to_string(), env_words.map(String::from).collect()));
    let path = std::env::var_os("PATH").unwrap_or_default();
    env_pager
        .into_iter()
        .chain([("pager".to_string(), vec![]), ("less".to_string(), vec![])])
        .find_map(|(program, args)| lookup(&program, &path).map(|found| (found, args)))
}

fn lookup(program: &str, path: &std::ffi::OsStr) -> Option<PathBuf> {
    if program.contains('/') {
        let candidate = Path::new(program);
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    std::env::split_paths(path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Count the added and removed lines of a text diff.
pub(crate) fn count_changes(diff: &str) -> (usize, usize) {
    diff.lines().fold((0, 0), |(add, remove), line| {
        if line.starts_with('+') {
            (add + 1, remove)
        } else if line.starts_with('-') {
            (add, remove + 1)
        } else {
            (add, remove)
        }
    })
}

/// Fail unless the API considers `version` valid.
pub(crate) async fn validate(
    api: &dyn ConfigApi,
    terminal: &mut dyn Terminal,
    service: &Service,
    version: u32,
) -> Result<()> {
    let validation = api
        .validate_version(&service.id, version)
        .await
        .context("validating version")?;
    if !validation.is_ok() {
        let mut message = validation.msg;
        for line in validation.errors {
            message.push('\n');
            message.push_str(&line);
        }
        return Err(anyhow!(
            "Version {} on service {} is invalid:\n\n{}",
            version,
            service.name,
            message.trim()
        ));
    }
    terminal.say(&format!(
        "Version {} on service {} successfully validated!",
        version, service.name
    ));
    Ok(())
}

/// Validate `draft`, show what it changes and activate it if confirmed.
///
/// Returns whether the draft was activated. A declined draft stays in place
/// and is picked up again by the next run.
pub(crate) async fn activate(
    api: &dyn ConfigApi,
    terminal: &mut dyn Terminal,
    assume_yes: bool,
    service: &Service,
    draft: &Version,
) -> Result<bool> {
    if !assume_yes && !terminal.is_interactive() {
        bail!(NON_INTERACTIVE);
    }
    let active = service.active_version()?;
    validate(api, terminal, service, draft.number).await?;

    let diff = api
        .diff(&service.id, active, draft.number, DiffFormat::Text)
        .await?;
    let title = format!("Diff for {}:", service.name);

    if assume_yes {
        terminal.say(&format!("{}\n\n{}", title, diff.diff));
    } else {
        let (additions, removals) = count_changes(&diff.diff);
        if terminal.confirm(&format!(
            "{} additions and {} removals in diff. View?",
            additions, removals
        ))? {
            terminal.page(&title, &diff.diff)?;
        }
        if !terminal.confirm(&format!(
            "Activate version {} for service {}?",
            draft.number, service.name
        ))? {
            return Ok(false);
        }
    }

    api.activate_version(&service.id, draft.number).await?;
    terminal.say(&format!(
        "Activated version {} for {}. Old version: {}",
        draft.number, service.name, active
    ));
    Ok(true)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        draft::{get_draft, DraftRegistry},
        testing::{Call, FakeApi},
    };
    use cdnsync_api::{
        client,
        schema::{Domain, Validation},
    };
    use std::collections::VecDeque;

    /// A terminal that answers from a script and keeps what was shown.
    pub(crate) struct Scripted {
        pub interactive: bool,
        pub answers: VecDeque<bool>,
        pub questions: Vec<String>,
        pub output: Vec<String>,
        pub paged: Vec<String>,
    }

    impl Scripted {
        pub(crate) fn new(interactive: bool, answers: &[bool]) -> Self {
            Self {
                interactive,
                answers: answers.iter().copied().collect(),
                questions: vec![],
                output: vec![],
                paged: vec![],
            }
        }
    }

    impl Terminal for Scripted {
        fn is_interactive(&self) -> bool {
            self.interactive
        }

        fn confirm(&mut self, question: &str) -> Result<bool> {
            self.questions.push(question.to_string());
            self.answers
                .pop_front()
                .ok_or_else(|| anyhow!("unexpected question: {}", question))
        }

        fn page(&mut self, _title: &str, text: &str) -> Result<()> {
            self.paged.push(text.to_string());
            Ok(())
        }

        fn say(&mut self, line: &str) {
            self.output.push(line.to_string());
        }
    }

    async fn changed_draft(api: &FakeApi) -> (Service, Version) {
        let service = api.add_service("SVC", "www");
        let draft = get_draft(api, &mut DraftRegistry::default(), &service)
            .await
            .unwrap();
        let domain = Domain {
            name: "new.example.com".to_string(),
            ..Default::default()
        };
        client::create(api, "SVC", draft.number, &domain)
            .await
            .unwrap();
        api.clear_calls();
        (service, draft)
    }

    #[test]
    fn counts_changed_lines() {
        let diff = "+added\n-removed\n unchanged\n+another\n";
        assert_eq!(count_changes(diff), (2, 1));
        assert_eq!(count_changes(""), (0, 0));
    }

    #[tokio::test]
    async fn accept_activates() {
        let api = FakeApi::new();
        let (service, draft) = changed_draft(&api).await;
        let mut term = Scripted::new(true, &[true, true]);

        assert!(activate(&api, &mut term, false, &service, &draft)
            .await
            .unwrap());
        assert_eq!(
            term.questions,
            vec![
                "1 additions and 0 removals in diff. View?".to_string(),
                "Activate version 2 for service www?".to_string(),
            ]
        );
        assert_eq!(term.paged.len(), 1);
        assert!(api.mutations().contains(&Call::ActivateVersion(2)));
        assert_eq!(
            term.output.last().unwrap(),
            "Activated version 2 for www. Old version: 1"
        );
        assert!(api.version("SVC", 2).active);
    }

    #[tokio::test]
    async fn decline_leaves_draft_pending() {
        let api = FakeApi::new();
        let (service, draft) = changed_draft(&api).await;
        let mut term = Scripted::new(true, &[false, false]);

        assert!(!activate(&api, &mut term, false, &service, &draft)
            .await
            .unwrap());
        assert!(term.paged.is_empty());
        assert_eq!(api.mutations(), vec![]);
        assert!(!api.version("SVC", 2).active);
    }

    #[tokio::test]
    async fn assume_yes_prints_and_activates() {
        let api = FakeApi::new();
        let (service, draft) = changed_draft(&api).await;
        let mut term = Scripted::new(false, &[]);

        assert!(activate(&api, &mut term, true, &service, &draft)
            .await
            .unwrap());
        assert!(term.questions.is_empty());
        assert!(term.output.iter().any(|l| l.starts_with("Diff for www:")));
        assert!(api.mutations().contains(&Call::ActivateVersion(2)));
    }

    #[tokio::test]
    async fn non_interactive_without_assume_yes_fails_first() {
        let api = FakeApi::new();
        let (service, draft) = changed_draft(&api).await;
        let mut term = Scripted::new(false, &[]);

        let err = activate(&api, &mut term, false, &service, &draft)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), NON_INTERACTIVE);
        assert_eq!(api.calls(), vec![]);
    }

    #[tokio::test]
    async fn invalid_version_is_not_activated() {
        let api = FakeApi::new();
        let (service, draft) = changed_draft(&api).await;
        api.set_validation(Validation {
            status: "error".to_string(),
            msg: "Backend origin has no host".to_string(),
            ..Default::default()
        });
        let mut term = Scripted::new(true, &[true, true]);

        let err = activate(&api, &mut term, false, &service, &draft)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Version 2 on service www is invalid:\n\nBackend origin has no host"
        );
        assert!(term.questions.is_empty());
        assert_eq!(api.mutations(), vec![]);
    }

    #[test]
    fn lookup_finds_executables_on_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mypager"), "").unwrap();
        let path = std::env::join_paths([dir.path()]).unwrap();
        assert_eq!(
            lookup("mypager", &path),
            Some(dir.path().join("mypager"))
        );
        assert_eq!(lookup("nonexistent-pager", &path), None);
    }
}
