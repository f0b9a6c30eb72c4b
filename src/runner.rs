use crate::browser::{BrowserOpener, SystemBrowser};
use crate::error::{QdbgError, Result, EXIT_FAILURE};
use crate::execution::Invocation;
use crate::executor::{ProcessRunner, SystemProcessRunner};
use crate::search::{ScanDirection, SearchEngine};
use std::io::{self, Write};

/// How a completed run ended when no error was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command exited 0 and its output was forwarded.
    Success,
    /// The command failed and a search for its error was opened.
    SearchOpened { url: String, exit_code: i32 },
}

impl Outcome {
    /// Status qdbg itself should exit with.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::SearchOpened { .. } => EXIT_FAILURE,
        }
    }
}

pub struct Runner<P, B> {
    process: P,
    browser: B,
    engine: SearchEngine,
    direction: ScanDirection,
}

impl Runner<SystemProcessRunner, SystemBrowser> {
    pub fn system() -> Self {
        Self::new(SystemProcessRunner, SystemBrowser::from_env())
    }
}

impl<P: ProcessRunner, B: BrowserOpener> Runner<P, B> {
    pub fn new(process: P, browser: B) -> Self {
        Self {
            process,
            browser,
            engine: SearchEngine::default(),
            direction: ScanDirection::default(),
        }
    }

    pub fn with_search(mut self, engine: SearchEngine, direction: ScanDirection) -> Self {
        self.engine = engine;
        self.direction = direction;
        self
    }

    /// Run `args`, forwarding stdout to `out` on success.
    ///
    /// Nothing is written to `out` unless the command succeeded.
    pub fn run<W: Write>(&self, args: Vec<String>, out: &mut W) -> Result<Outcome> {
        let invocation = Invocation::new(args)?;

        let result = self.process.run(&invocation).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                QdbgError::CommandNotFound {
                    program: invocation.program().to_string(),
                    source: e,
                }
            } else {
                QdbgError::Internal(e)
            }
        })?;

        if result.success() {
            let stdout = result.stdout_text();
            writeln!(out, "{}", stdout.trim_end()).map_err(QdbgError::Internal)?;
            out.flush().map_err(QdbgError::Internal)?;
            return Ok(Outcome::Success);
        }

        let url = self
            .engine
            .url_for(invocation.program(), &result.stderr_text(), self.direction);
        tracing::info!(command = %invocation, exit_code = result.exit_code, %url, "command failed, opening search");

        if !self.browser.open(&url) {
            return Err(QdbgError::BrowserUnavailable { url });
        }
        Ok(Outcome::SearchOpened {
            url,
            exit_code: result.exit_code,
        })
    }
}

impl<T: ProcessRunner + ?Sized> ProcessRunner for &T {
    fn run(&self, invocation: &Invocation) -> io::Result<crate::execution::ExecutionResult> {
        (**self).run(invocation)
    }
}

impl<T: BrowserOpener + ?Sized> BrowserOpener for &T {
    fn open(&self, url: &str) -> bool {
        (**self).open(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::ExecutionResult;
    use std::cell::{Cell, RefCell};
    use std::error::Error as _;

    struct FakeProcess {
        respond: Box<dyn Fn() -> io::Result<ExecutionResult>>,
        spawned: RefCell<Vec<Invocation>>,
    }

    impl FakeProcess {
        fn exiting(exit_code: i32, stdout: &str, stderr: &str) -> Self {
            let (stdout, stderr) = (stdout.as_bytes().to_vec(), stderr.as_bytes().to_vec());
            Self::responding(move || {
                Ok(ExecutionResult {
                    exit_code,
                    stdout: stdout.clone(),
                    stderr: stderr.clone(),
                })
            })
        }

        fn failing(kind: io::ErrorKind) -> Self {
            Self::responding(move || Err(io::Error::new(kind, "spawn failed")))
        }

        fn responding(f: impl Fn() -> io::Result<ExecutionResult> + 'static) -> Self {
            Self {
                respond: Box::new(f),
                spawned: RefCell::new(Vec::new()),
            }
        }
    }

    impl ProcessRunner for FakeProcess {
        fn run(&self, invocation: &Invocation) -> io::Result<ExecutionResult> {
            self.spawned.borrow_mut().push(invocation.clone());
            (self.respond)()
        }
    }

    struct FakeBrowser {
        available: bool,
        opened: RefCell<Vec<String>>,
        calls: Cell<usize>,
    }

    impl FakeBrowser {
        fn new(available: bool) -> Self {
            Self {
                available,
                opened: RefCell::new(Vec::new()),
                calls: Cell::new(0),
            }
        }
    }

    impl BrowserOpener for FakeBrowser {
        fn open(&self, url: &str) -> bool {
            self.calls.set(self.calls.get() + 1);
            self.opened.borrow_mut().push(url.to_string());
            self.available
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn successful_command_forwards_trimmed_stdout() {
        let process = FakeProcess::exiting(0, "mock stdout\n\n  ", "ignored warning");
        let browser = FakeBrowser::new(true);
        let mut out = Vec::new();

        let outcome = Runner::new(&process, &browser).run(args(&["cmd"]), &mut out).unwrap();

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "mock stdout\n");
        assert_eq!(browser.calls.get(), 0);
    }

    #[test]
    fn failing_command_opens_exactly_one_search() {
        let process = FakeProcess::exiting(2, "partial output", "Traceback\nValueError: boom\n");
        let browser = FakeBrowser::new(true);
        let mut out = Vec::new();

        let outcome = Runner::new(&process, &browser)
            .run(args(&["python3", "script.py"]), &mut out)
            .unwrap();

        let expected = "https://you.com/search?q=python3+ValueError%3A+boom".to_string();
        assert_eq!(outcome, Outcome::SearchOpened { url: expected.clone(), exit_code: 2 });
        assert_eq!(outcome.exit_code(), 1);
        assert!(out.is_empty());
        assert_eq!(*browser.opened.borrow(), vec![expected]);
    }

    #[test]
    fn search_settings_are_applied() {
        let process = FakeProcess::exiting(1, "", "first\nlast");
        let browser = FakeBrowser::new(true);

        Runner::new(&process, &browser)
            .with_search(SearchEngine::new("example.org"), ScanDirection::FromTop)
            .run(args(&["tool"]), &mut Vec::new())
            .unwrap();

        assert_eq!(
            *browser.opened.borrow(),
            vec!["https://example.org/search?q=tool+first".to_string()]
        );
    }

    #[test]
    fn missing_browser_is_an_error() {
        let process = FakeProcess::exiting(1, "", "");
        let browser = FakeBrowser::new(false);

        let err = Runner::new(&process, &browser)
            .run(args(&["cmd"]), &mut Vec::new())
            .unwrap_err();

        assert!(matches!(err, QdbgError::BrowserUnavailable { ref url } if url == "https://you.com/search?q=cmd+"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn empty_invocation_never_spawns() {
        let process = FakeProcess::exiting(0, "", "");
        let browser = FakeBrowser::new(true);

        let err = Runner::new(&process, &browser).run(vec![], &mut Vec::new()).unwrap_err();

        assert!(matches!(err, QdbgError::MissingCommand));
        assert!(process.spawned.borrow().is_empty());
        assert_eq!(browser.calls.get(), 0);
    }

    #[test]
    fn unknown_program_maps_to_command_not_found() {
        let process = FakeProcess::failing(io::ErrorKind::NotFound);
        let browser = FakeBrowser::new(true);

        let err = Runner::new(&process, &browser)
            .run(args(&["nope", "--flag"]), &mut Vec::new())
            .unwrap_err();

        match &err {
            QdbgError::CommandNotFound { program, .. } => assert_eq!(program, "nope"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.exit_code(), 127);
        assert_eq!(browser.calls.get(), 0);
    }

    #[test]
    fn other_spawn_failures_are_internal_and_keep_the_cause() {
        let process = FakeProcess::failing(io::ErrorKind::PermissionDenied);
        let browser = FakeBrowser::new(true);

        let err = Runner::new(&process, &browser)
            .run(args(&["./not-executable"]), &mut Vec::new())
            .unwrap_err();

        assert!(matches!(err, QdbgError::Internal(_)));
        let cause = err.source().unwrap().downcast_ref::<io::Error>().unwrap();
        assert_eq!(cause.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn each_run_is_independent() {
        let process = FakeProcess::exiting(1, "", "oops");
        let browser = FakeBrowser::new(true);
        let runner = Runner::new(&process, &browser);

        let first = runner.run(args(&["a"]), &mut Vec::new()).unwrap();
        let second = runner.run(args(&["a"]), &mut Vec::new()).unwrap();

        assert_eq!(first, second);
        assert_eq!(process.spawned.borrow().len(), 2);
        assert_eq!(browser.calls.get(), 2);
    }
}
