//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a credder command isolated from the caller's environment.
    ///
    /// Returns a Command configured with:
    /// - HOME and the cache root set to the temporary home directory
    /// - no GitLab token, and resolution disabled
    /// - the current directory set to the test project directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("credder").expect("failed to find credder binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("XDG_CACHE_HOME", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env("CREDDER_RESOLVER", "none");
        cmd.env_remove("GL_PAT");
        cmd.env_remove("GITLAB_TOKEN");
        cmd.env_remove("CREDDER_GITLAB_URL");
        cmd.env_remove("CREDDER_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run credder with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run credder")
    }

    /// Shortcut for `credder format`.
    pub fn format(&self) -> Output {
        self.run(&["format"])
    }
}
