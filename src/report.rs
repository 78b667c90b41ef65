//! Build event reporting
//!
//! The pipeline never touches a process-wide logger. Whoever constructs
//! a [`Platform`](crate::sdk::Platform) injects the sink that receives
//! stage transitions and the exact command lines being spawned.

use console::style;

/// Sink for structured build events.
pub trait Reporter {
    /// A pipeline stage is starting
    fn stage(&self, name: &str);

    /// An external tool is about to be spawned with this command line
    fn command(&self, cmdline: &[String]);

    /// Free-form progress note
    fn note(&self, message: &str);
}

/// Terminal reporter used by the CLI.
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn stage(&self, name: &str) {
        println!("{} {}", style("==>").green().bold(), name);
    }

    fn command(&self, cmdline: &[String]) {
        if self.verbose {
            println!("{} {}", style("$").dim(), cmdline.join(" "));
        }
    }

    fn note(&self, message: &str) {
        println!("    {}", message);
    }
}

/// Reporter that swallows everything. Useful for library embedding and
/// tests.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn stage(&self, _name: &str) {}
    fn command(&self, _cmdline: &[String]) {}
    fn note(&self, _message: &str) {}
}
