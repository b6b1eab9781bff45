//! Shared fixtures: a fake Excelsior JET installation made of shell scripts.
#![allow(dead_code)]

use jet_bundler::bundler::{
    CollectingSink, Context, Environment, OsCapabilities, PlatformFamily, Settings,
    SettingsBuilder,
};
use std::{
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::TempDir;

pub const PRO_32: &str = "Excelsior JET 11.5 Professional Edition";
pub const ENTERPRISE_64: &str = "Excelsior JET 15.0 Enterprise Edition, 64-bit";
pub const STANDARD_64: &str = "Excelsior JET 15.0 Standard Edition, 64-bit";

/// Prints the banner when called without arguments; otherwise records its
/// arguments and creates the executable named by `-outputname=` in the project file.
const JC: &str = r#"#!/bin/sh
bin_dir=$(dirname "$0")
if [ $# -eq 0 ]; then
    echo "Excelsior JET compiler"
    cat "$bin_dir/banner.txt"
    exit 0
fi
printf '%s\n' "$@" > jc.args
if [ -f "$bin_dir/jc.fail" ]; then
    echo "error: out of licenses" >&2
    exit 3
fi
name=$(sed -n 's/^-outputname=//p' "$2")
printf '#!/bin/sh\necho hello\n' > "$name"
chmod +x "$name"
"#;

/// Records its arguments, then copies `-add-file` and `-source` contents into the
/// target directory, or writes a placeholder installer when a backend is given.
const XPACK: &str = r#"#!/bin/sh
printf '%s\n' "$@" >> xpack.args
echo "--" >> xpack.args
target=""
backend=""
files=""
source_dir=""
detached=""
while [ $# -gt 0 ]; do
    case "$1" in
        -add-file) files="$files $2"; shift 3 ;;
        -source) source_dir="$2"; shift 2 ;;
        -target) target="$2"; shift 2 ;;
        -backend) backend="$2"; shift 2 ;;
        -detached-package) detached="$2"; shift 2 ;;
        *) shift ;;
    esac
done
if [ -n "$backend" ]; then
    echo "installer" > "$target"
    exit 0
fi
mkdir -p "$target"
for f in $files; do
    cp -p "$f" "$target/"
done
if [ -n "$source_dir" ]; then
    cp -R "$source_dir/." "$target/"
fi
if [ -n "$detached" ]; then
    echo "pkl" > "$detached"
fi
"#;

/// Records its arguments and writes the startup profile it was asked for.
const XJAVA: &str = r#"#!/bin/sh
printf '%s\n' "$@" > xjava.args
for arg in "$@"; do
    case "$arg" in
        -Djet.jit.profile.startup=*) echo "startup" > "${arg#-Djet.jit.profile.startup=}" ;;
    esac
done
exit ${XJAVA_EXIT:-0}
"#;

/// A fake JET home inside a temporary directory.
pub struct FakeJet {
    dir: TempDir,
}

impl FakeJet {
    pub fn new(banner: &str) -> Self {
        Self::with_version(banner, 1150)
    }

    pub fn with_version(banner: &str, version: i32) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("jet.config"), "").unwrap();
        std::fs::write(bin.join(format!("jet{version}.home")), "").unwrap();
        std::fs::write(bin.join("banner.txt"), format!("{banner}\n")).unwrap();
        write_script(&bin.join("jc"), JC);
        write_script(&bin.join("xpack"), XPACK);
        write_script(&bin.join("xjava"), XJAVA);
        Self { dir }
    }

    pub fn home(&self) -> &Path {
        self.dir.path()
    }

    pub fn home_str(&self) -> String {
        self.home().display().to_string()
    }

    pub fn bin(&self) -> PathBuf {
        self.home().join("bin")
    }

    /// Make the next compilation fail with exit code 3.
    pub fn fail_compilation(&self) {
        std::fs::write(self.bin().join("jc.fail"), "").unwrap();
    }
}

pub fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// A project directory with a main jar, a dependency and a configuration.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("target")).unwrap();
        std::fs::create_dir_all(dir.path().join("repo")).unwrap();
        std::fs::write(dir.path().join("target/hello.jar"), b"main jar").unwrap();
        std::fs::write(dir.path().join("repo/util-1.0.jar"), b"util jar").unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn output(&self) -> PathBuf {
        self.root().join("target/jet")
    }

    /// Base configuration followed by `extra` TOML.
    pub fn config(&self, jet: &FakeJet, extra: &str) -> String {
        format!(
            r#"
version = 1

[project]
group_id = "com.example"
artifact_id = "hello"
version = "1.0"
vendor = "Example"

[build]
main_jar = "target/hello.jar"
main_class = "com.example.Hello"
jet_home = "{}"
{extra}

[[dependencies]]
group_id = "org.other"
path = "repo/util-1.0.jar"
"#,
            jet.home_str()
        )
    }

    pub fn write_config(&self, jet: &FakeJet, extra: &str) -> PathBuf {
        let path = self.root().join("jet-bundler.toml");
        std::fs::write(&path, self.config(jet, extra)).unwrap();
        path
    }

    pub fn settings(&self, jet: &FakeJet, extra: &str) -> Settings {
        SettingsBuilder::new()
            .source(self.config(jet, extra))
            .base_dir(self.root())
            .build()
            .unwrap()
    }
}

/// Linux context with the inherited environment and a collecting sink.
pub fn linux_ctx() -> (Context, Arc<CollectingSink>) {
    ctx_with(Environment::inherit())
}

pub fn ctx_with(env: Environment) -> (Context, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::new());
    let ctx = Context::new(
        sink.clone(),
        OsCapabilities::new(PlatformFamily::Linux),
        env,
    );
    (ctx, sink)
}

pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
