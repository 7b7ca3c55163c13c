use clap::Parser;
use std::path::PathBuf;

use patterns::cli::{Cli, Commands};

#[test]
fn test_parse_replay() {
    let cli = Cli::try_parse_from(["patterns", "replay", "events.jsonl"]).unwrap();

    match cli.command {
        Commands::Replay(args) => {
            assert_eq!(args.log, PathBuf::from("events.jsonl"));
            assert!(args.state.is_none());
        }
        _ => panic!("Wrong top-level command"),
    }
    assert!(!cli.json);
}

#[test]
fn test_parse_replay_with_state_filter() {
    let cli = Cli::try_parse_from(["patterns", "replay", "events.jsonl", "--state", "stable"]).unwrap();

    match cli.command {
        Commands::Replay(args) => assert_eq!(args.state.as_deref(), Some("stable")),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_similarity_raw() {
    let cli = Cli::try_parse_from(["patterns", "similarity", "a.diff", "b.diff", "--raw"]).unwrap();

    match cli.command {
        Commands::Similarity(args) => {
            assert_eq!(args.left, PathBuf::from("a.diff"));
            assert_eq!(args.right, PathBuf::from("b.diff"));
            assert!(args.raw);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["patterns", "config", "--json", "--config", "custom.yaml"]).unwrap();

    assert!(matches!(cli.command, Commands::Config));
    assert!(cli.json);
    assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
}

#[test]
fn test_similarity_requires_two_files() {
    assert!(Cli::try_parse_from(["patterns", "similarity", "a.diff"]).is_err());
}

#[test]
fn test_unknown_subcommand_rejected() {
    assert!(Cli::try_parse_from(["patterns", "promote"]).is_err());
}
