//! CLI surface specs: help text and the `list` subcommand.

use crate::prelude::*;

#[test]
fn no_args_exits_nonzero() {
    cli().fails();
}

#[test]
fn help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn run_help_shows_the_scenario_argument() {
    cli().args(&["run", "--help"]).passes().stdout_has("SCENARIO");
}

#[test]
fn list_shows_all_six_scenarios() {
    cli()
        .args(&["list"])
        .passes()
        .stdout_has("s1")
        .stdout_has("s2")
        .stdout_has("s3")
        .stdout_has("s4")
        .stdout_has("s5")
        .stdout_has("s6");
}
