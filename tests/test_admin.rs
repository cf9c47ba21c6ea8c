//! Tests for the operator console

use courier::server::ServerState;
use courier::server::admin::{self, render_status};
use std::sync::Arc;

fn run_console(state: &ServerState, input: &str) -> String {
    let mut out = Vec::new();
    admin::run(state, input.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_status_reports_counters() {
    let state = Arc::new(ServerState::new("/srv/files"));
    let _a = state.connection_opened();
    let b = state.connection_opened();
    drop(b);

    let out = run_console(&state, "status\n");

    assert!(out.contains("=== SERVER STATUS ==="));
    assert!(out.contains("Uptime: "));
    assert!(out.contains("Total Users: 2\n"));
    assert!(out.contains("Active Users: 1\n"));
    assert!(out.contains("Directory: /srv/files\n"));
    assert!(out.contains("Status: Running\n"));
    assert!(!state.is_shutting_down());
}

#[test]
fn test_quit_sets_shutdown_and_stops_reading() {
    let state = ServerState::new(".");

    let out = run_console(&state, "quit\nhelp\n");

    assert!(state.is_shutting_down());
    assert!(out.contains("Initiating server shutdown..."));
    assert!(!out.contains("Available commands"));
}

#[test]
fn test_quit_is_idempotent() {
    let state = ServerState::new(".");
    state.request_shutdown();

    run_console(&state, "quit\n");

    assert!(state.is_shutting_down());
    assert!(render_status(&state).contains("Status: Shutting down"));
}

#[test]
fn test_help_lists_commands() {
    let state = ServerState::new(".");

    let out = run_console(&state, "HELP\n");

    assert!(out.contains("Available commands:"));
    assert!(out.contains("status"));
    assert!(out.contains("quit"));
    assert!(out.contains("help"));
}

#[test]
fn test_empty_lines_are_ignored() {
    let state = ServerState::new(".");

    let out = run_console(&state, "\n   \n\r\n");

    assert_eq!(out, "");
    assert!(!state.is_shutting_down());
}

#[test]
fn test_unknown_command_hint() {
    let state = ServerState::new(".");

    let out = run_console(&state, "reboot\n");

    assert_eq!(
        out,
        "Unknown command: reboot\nType 'help' for available commands\n"
    );
}

#[test]
fn test_end_of_input_leaves_server_running() {
    let state = ServerState::new(".");

    run_console(&state, "status");

    assert!(!state.is_shutting_down());
}
