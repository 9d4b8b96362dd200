//! Behaviour shared by every host, exercised through the `BuildAgent` trait.

use hostkit_agent::{
    AgentConfig, BuildAgent, HostKind, MemorySink, TaskOutcome, create_agent,
};
use hostkit_core::env::PATH_VAR;
use hostkit_core::{EnvStore, Error, MemoryEnv};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

const HOSTS: [HostKind; 3] = [HostKind::Azure, HostKind::Github, HostKind::Local];

fn agent_with(host: HostKind, env: Arc<MemoryEnv>) -> Box<dyn BuildAgent> {
    let config = AgentConfig {
        host,
        ..AgentConfig::default()
    };
    create_agent(&config, env, Arc::new(MemorySink::new()))
}

fn agent(host: HostKind, pairs: &[(&str, &str)]) -> Box<dyn BuildAgent> {
    agent_with(host, Arc::new(MemoryEnv::from_pairs(pairs.iter().copied())))
}

fn cache_var(host: HostKind) -> &'static str {
    match host {
        HostKind::Azure => "AGENT_TOOLSDIRECTORY",
        HostKind::Github => "RUNNER_TOOL_CACHE",
        _ => "AGENT_TOOLS_DIR",
    }
}

#[test]
fn test_required_input_empty_or_blank_fails() {
    for host in HOSTS {
        for value in [None, Some(""), Some("   \t")] {
            let env = MemoryEnv::new();
            if let Some(v) = value {
                env.set("INPUT_VERSIONSPEC", v);
            }
            let agent = agent_with(host, Arc::new(env));

            let err = agent.get_input("versionSpec", true).unwrap_err();
            assert!(
                matches!(err, Error::MissingRequiredInput { ref key } if key == "INPUT_VERSIONSPEC"),
                "{host:?} {value:?}: {err}"
            );
            assert_eq!(agent.get_input("versionSpec", false).unwrap(), "");
        }
    }
}

#[test]
fn test_input_is_trimmed_and_key_transformed() {
    for host in HOSTS {
        let agent = agent(host, &[("INPUT_TARGET_PATH", "  /repo/src \n")]);
        assert_eq!(agent.get_input("target path", true).unwrap(), "/repo/src");
    }
}

#[test]
fn test_boolean_input() {
    let cases = [
        (Some("true"), true),
        (Some("TRUE"), true),
        (Some(" True "), true),
        (Some("false"), false),
        (Some("yes"), false),
        (Some(""), false),
        (None, false),
    ];
    for (value, expected) in cases {
        let env = MemoryEnv::new();
        if let Some(v) = value {
            env.set("INPUT_PRERELEASE", v);
        }
        let agent = agent_with(HostKind::Local, Arc::new(env));
        assert_eq!(
            agent.get_boolean_input("prerelease", false).unwrap(),
            expected,
            "{value:?}"
        );
    }
}

#[test]
fn test_list_and_delimited_inputs() {
    let agent = agent(
        HostKind::Github,
        &[("INPUT_TARGETS", "a\nb\n\nc"), ("INPUT_ARGS", "/verbosity,, /nofetch")],
    );
    assert_eq!(agent.get_list_input("targets", false).unwrap(), vec!["a", "b", "c"]);
    assert_eq!(
        agent.get_delimited_input("args", ",", false).unwrap(),
        vec!["/verbosity", "/nofetch"]
    );
    assert!(agent.get_list_input("missing", true).is_err());
}

#[test]
fn test_expanded_string() {
    let agent = agent(HostKind::Local, &[("HOME", "/h"), ("USER", "u")]);
    assert_eq!(agent.get_expanded_string("$HOME/${USER}/x"), "/h/u/x");
    assert_eq!(agent.get_expanded_string("${}"), "");
}

#[test]
fn test_variable_as_path_is_absolute() {
    let agent = agent(HostKind::Local, &[("AGENT_TEMP_DIR", "scratch/../tmp")]);
    let path = agent.get_temp_dir().unwrap().unwrap();
    assert!(path.is_absolute());
    assert!(path.ends_with("tmp"));
    assert!(!path.to_string_lossy().contains(".."));
}

#[tokio::test]
async fn test_cache_then_find_roundtrip() {
    for host in HOSTS {
        let root = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("lib")).unwrap();
        std::fs::write(src.path().join("gitversion"), b"binary").unwrap();
        std::fs::write(src.path().join("lib/dep"), b"dep").unwrap();

        let root_dir = root.path().to_string_lossy().into_owned();
        let agent = agent(host, &[(cache_var(host), root_dir.as_str())]);

        let cached = agent
            .cache_tool_directory(src.path(), "tool", "1.2.3")
            .await
            .unwrap()
            .unwrap();
        let found = agent.find_local_tool("tool", "1.2.3").await.unwrap();

        assert_eq!(found.as_deref(), Some(cached.as_path()), "{host:?}");
        assert_eq!(std::fs::read(cached.join("gitversion")).unwrap(), b"binary");
        assert_eq!(std::fs::read(cached.join("lib/dep")).unwrap(), b"dep");
    }
}

#[tokio::test]
async fn test_recache_replaces_previous_contents() {
    let root = tempfile::tempdir().unwrap();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    std::fs::write(first.path().join("old.txt"), b"old").unwrap();
    std::fs::write(second.path().join("new.txt"), b"new").unwrap();

    let root_dir = root.path().to_string_lossy().into_owned();
    let agent = agent(HostKind::Local, &[("AGENT_TOOLS_DIR", root_dir.as_str())]);

    agent
        .cache_tool_directory(first.path(), "tool", "1.2.3")
        .await
        .unwrap();
    let dest = agent
        .cache_tool_directory(second.path(), "tool", "1.2.3")
        .await
        .unwrap()
        .unwrap();

    let mut names: Vec<String> = std::fs::read_dir(&dest)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["new.txt"]);
}

#[tokio::test]
async fn test_cache_without_root_is_soft() {
    let src = tempfile::tempdir().unwrap();
    let agent = agent(HostKind::Azure, &[]);

    assert_eq!(
        agent
            .cache_tool_directory(src.path(), "tool", "1.2.3")
            .await
            .unwrap(),
        None
    );
    assert_eq!(agent.find_local_tool("tool", "1.2.3").await.unwrap(), None);
}

#[cfg(unix)]
#[tokio::test]
async fn test_exec_failure_is_data() {
    let agent = agent_with(HostKind::Local, Arc::new(MemoryEnv::from_process()));
    let result = agent.exec("false", &[]).await;
    assert_ne!(result.code, Some(0));
    assert!(result.error.is_some());
}

#[cfg(unix)]
#[tokio::test]
async fn test_add_path_is_seen_by_which_and_exec() {
    use std::os::unix::fs::PermissionsExt;

    let bin = tempfile::tempdir().unwrap();
    let tool = bin.path().join("hostkit-probe-tool");
    std::fs::write(&tool, "#!/bin/sh\necho probed\n").unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

    let env = Arc::new(MemoryEnv::from_process());
    let agent = agent_with(HostKind::Local, env.clone());
    assert!(agent.which("hostkit-probe-tool").await.is_err());

    agent.add_path(bin.path()).unwrap();

    let found = agent.which("hostkit-probe-tool").await.unwrap();
    assert_eq!(found, std::fs::canonicalize(&tool).unwrap());
    assert!(env.get(PATH_VAR).unwrap().starts_with(&*bin.path().to_string_lossy()));
    assert_eq!(env.get("Path"), env.get(PATH_VAR));

    let result = agent.exec("hostkit-probe-tool", &[]).await;
    assert!(result.is_success(), "{result:?}");
    assert_eq!(result.stdout.trim(), "probed");
}

#[test]
fn test_add_path_on_empty_path() {
    let env = Arc::new(MemoryEnv::new());
    let agent = agent_with(HostKind::Local, env.clone());
    agent.add_path(Path::new("/new/bin")).unwrap();
    assert_eq!(env.get(PATH_VAR).as_deref(), Some("/new/bin"));
}

#[test]
fn test_failure_routes_through_outcome() {
    for host in HOSTS {
        let agent = agent(host, &[]);
        let err = agent.get_input("versionSpec", true).unwrap_err();
        agent.set_failed(&err.to_string(), true);
        assert!(matches!(
            agent.outcome(),
            Some(TaskOutcome::Failed { done: true, .. })
        ));
    }
}
