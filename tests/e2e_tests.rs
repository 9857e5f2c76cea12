//! End-to-end run with shell-script stand-ins for yt-dlp and ffmpeg
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FAKE_RESOLVER: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then echo "2024.01.01"; exit 0; fi
echo "https://cdn.example/video.mp4"
echo "https://cdn.example/audio.m4a"
"#;

// Stream copy fails; re-encode writes the output (last argument)
const FAKE_TRANSCODER: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then echo "ffmpeg version 6.1"; exit 0; fi
for last; do :; done
case " $* " in
  *" -c copy "*) echo "copy not possible" >&2; exit 1 ;;
esac
echo "$*" > "$last"
"#;

fn install_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn test_run_with_scripted_tools() {
    let temp = TempDir::new().unwrap();
    let resolver = install_script(temp.path(), "fake-yt-dlp", FAKE_RESOLVER);
    let transcoder = install_script(temp.path(), "fake-ffmpeg", FAKE_TRANSCODER);
    std::fs::write(
        temp.path().join("timestamps.csv"),
        "Timestamp,ClipName\n00:01:30,intro scene\nnot-a-time,broken\n02:03,\n",
    )
    .unwrap();

    let output = Command::cargo_bin("clipper")
        .unwrap()
        .current_dir(temp.path())
        .env_remove("RUST_LOG")
        .args(["run", "-s", "https://youtu.be/abc", "-m", "timestamps.csv", "--format", "json"])
        .arg("--resolver")
        .arg(&resolver)
        .arg("--transcoder")
        .arg(&transcoder)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["state"], "Done");
    assert_eq!(report["source"]["stream_url"], "https://cdn.example/video.mp4");
    assert_eq!(report["rows"][0]["strategy_used"], "ReEncode");
    assert_eq!(report["rows"][1]["kind"], "skipped");

    let intro = std::fs::read_to_string(temp.path().join("clips/intro_scene.mp4")).unwrap();
    assert!(intro.contains("-ss 90"));
    assert!(intro.contains("-i https://cdn.example/video.mp4"));
    assert!(intro.contains("-c:v libx264"));
    assert!(temp.path().join("clips/clip_3_02-03.mp4").exists());

    // Strict mode turns the skipped row into a failure exit
    Command::cargo_bin("clipper")
        .unwrap()
        .current_dir(temp.path())
        .args(["run", "-s", "https://youtu.be/abc", "-m", "timestamps.csv", "--strict"])
        .arg("--resolver")
        .arg(&resolver)
        .arg("--transcoder")
        .arg(&transcoder)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Summary: 2 succeeded, 1 skipped"));
}
