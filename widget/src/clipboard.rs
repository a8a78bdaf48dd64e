//! Copying the shared link, with fallbacks.
//!
//! Strategies are tried in order until one succeeds. When all fail the caller
//! gets [`CopyOutcome::Manual`] and should leave the link selectable.

use std::io::{IsTerminal, Write};
use std::process::{Command, Stdio};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while copying
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The named strategy cannot run in this environment
    #[error("{0} is not available")]
    Unavailable(&'static str),

    /// A clipboard tool ran but exited unsuccessfully
    #[error("Clipboard command failed: {0}")]
    CommandFailed(String),

    /// Spawning or talking to a clipboard tool failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One way of putting text on the clipboard
pub trait ClipboardStrategy: Send + Sync {
    /// Name reported when this strategy succeeds
    fn name(&self) -> &'static str;

    /// Puts `text` on the clipboard
    ///
    /// # Errors
    ///
    /// Returns an error if this strategy cannot copy in the current environment
    fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Result of a copy attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The text reached the clipboard
    Copied {
        /// Strategy that succeeded
        strategy: &'static str,
    },
    /// No strategy worked; the user has to copy by hand
    Manual,
}

/// Pipes text into the platform's clipboard tool
pub struct CommandClipboard {
    candidates: &'static [ClipboardTool],
}

type ClipboardTool = (&'static str, &'static [&'static str]);

const MACOS_TOOLS: &[ClipboardTool] = &[("pbcopy", &[])];
const WINDOWS_TOOLS: &[ClipboardTool] = &[("clip", &[])];
const UNIX_TOOLS: &[ClipboardTool] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

impl CommandClipboard {
    /// Clipboard tools for the current platform, in preference order
    #[must_use]
    pub const fn for_platform() -> Self {
        let candidates = if cfg!(target_os = "macos") {
            MACOS_TOOLS
        } else if cfg!(target_os = "windows") {
            WINDOWS_TOOLS
        } else {
            UNIX_TOOLS
        };
        Self { candidates }
    }

    fn run(program: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let written = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(text.as_bytes()));

        // Reap the child even when the write failed; stdin is closed by now
        let status = child.wait()?;
        if !status.success() {
            return Err(ClipboardError::CommandFailed(format!(
                "{program} exited with {status}"
            )));
        }
        written?;
        Ok(())
    }
}

impl ClipboardStrategy for CommandClipboard {
    fn name(&self) -> &'static str {
        "system clipboard"
    }

    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        for (program, args) in self.candidates {
            match Self::run(program, args, text) {
                Ok(()) => return Ok(()),
                Err(ClipboardError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                    debug!(program, "Clipboard tool not installed");
                }
                Err(err) => return Err(err),
            }
        }
        Err(ClipboardError::Unavailable(self.name()))
    }
}

/// Asks the terminal to set the clipboard with an OSC 52 escape sequence
pub struct Osc52Clipboard;

impl Osc52Clipboard {
    /// Escape sequence that copies `text`
    #[must_use]
    pub fn encode(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", BASE64.encode(text))
    }
}

impl ClipboardStrategy for Osc52Clipboard {
    fn name(&self) -> &'static str {
        "terminal escape"
    }

    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let mut stdout = std::io::stdout();
        if !stdout.is_terminal() {
            return Err(ClipboardError::Unavailable(self.name()));
        }
        stdout.write_all(Self::encode(text).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Ordered list of strategies
pub struct ClipboardChain {
    strategies: Vec<Box<dyn ClipboardStrategy>>,
}

impl ClipboardChain {
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn ClipboardStrategy>>) -> Self {
        Self { strategies }
    }

    /// System tool first, terminal escape second
    #[must_use]
    pub fn system() -> Self {
        Self::new(vec![
            Box::new(CommandClipboard::for_platform()),
            Box::new(Osc52Clipboard),
        ])
    }

    /// Tries each strategy until one copies `text`
    pub fn copy(&self, text: &str) -> CopyOutcome {
        for strategy in &self.strategies {
            match strategy.copy(text) {
                Ok(()) => {
                    return CopyOutcome::Copied {
                        strategy: strategy.name(),
                    }
                }
                Err(err) => debug!(strategy = strategy.name(), "Copy failed: {err}"),
            }
        }
        CopyOutcome::Manual
    }
}
