//! End-to-end builds and test runs against a fake Excelsior JET installation.
#![cfg(unix)]

mod common;

use common::{ENTERPRISE_64, FakeJet, PRO_32, Project, ctx_with, linux_ctx, read_lines};
use jet_bundler::bundler::{
    BuildPipeline, Environment, Error, Level, PackageType, clean, test_run,
};
use std::io::Read;

#[tokio::test]
async fn zip_build_stages_compiles_and_archives() {
    let jet = FakeJet::new(PRO_32);
    let project = Project::new();
    let (ctx, _) = linux_ctx();

    let artifact = BuildPipeline::new(project.settings(&jet, ""), ctx)
        .run()
        .await
        .unwrap();

    let out = project.output();
    let build = out.join("build");
    assert_eq!(artifact.package_type, PackageType::Zip);
    assert_eq!(artifact.paths, vec![out.join("hello.zip")]);
    assert!(artifact.size > 0);
    assert_eq!(artifact.checksum.as_deref().map(str::len), Some(64));

    assert_eq!(std::fs::read(build.join("hello.jar")).unwrap(), b"main jar");
    assert_eq!(std::fs::read(build.join("lib/util-1.0.jar")).unwrap(), b"util jar");
    assert_eq!(read_lines(&build.join("jc.args")), vec!["=p", "Hello.prj"]);

    let prj = std::fs::read_to_string(build.join("Hello.prj")).unwrap();
    assert!(prj.starts_with("-main=com/example/Hello\n"), "{prj}");
    assert!(prj.contains("!classpathentry hello.jar\n  -optimize=all\n  -protect=all\n!end"));
    assert!(prj.contains(
        "!classpathentry lib/util-1.0.jar\n  -optimize=autodetect\n  -protect=nomatter\n!end"
    ));

    let file = std::fs::File::open(out.join("hello.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut exe = String::new();
    archive
        .by_name("Hello")
        .unwrap()
        .read_to_string(&mut exe)
        .unwrap();
    assert!(exe.contains("echo hello"));
}

#[tokio::test]
async fn no_packaging_leaves_the_app_directory() {
    let jet = FakeJet::new(PRO_32);
    let project = Project::new();
    let (ctx, _) = linux_ctx();

    let artifact = BuildPipeline::new(project.settings(&jet, "packaging = \"none\""), ctx)
        .run()
        .await
        .unwrap();

    let app = project.output().join("app");
    assert_eq!(artifact.package_type, PackageType::Directory);
    assert_eq!(artifact.paths, vec![app.clone()]);
    assert!(app.join("Hello").is_file());
    assert!(!project.output().join("hello.zip").exists());
}

#[tokio::test]
async fn package_files_are_added_to_the_image() {
    let jet = FakeJet::new(PRO_32);
    let project = Project::new();
    let extra = project.root().join("jetresources/packagefiles/conf");
    std::fs::create_dir_all(&extra).unwrap();
    std::fs::write(extra.join("app.properties"), "debug=false").unwrap();
    let (ctx, _) = linux_ctx();

    BuildPipeline::new(project.settings(&jet, "packaging = \"none\""), ctx)
        .run()
        .await
        .unwrap();

    let staged = project.output().join("app/conf/app.properties");
    assert_eq!(std::fs::read_to_string(staged).unwrap(), "debug=false");
}

#[tokio::test]
async fn installer_uses_the_excelsior_backend() {
    let jet = FakeJet::new(PRO_32);
    let project = Project::new();
    let (ctx, _) = linux_ctx();

    let artifact = BuildPipeline::new(
        project.settings(&jet, "packaging = \"excelsior-installer\""),
        ctx,
    )
    .run()
    .await
    .unwrap();

    let installer = project.output().join("hello");
    assert_eq!(artifact.package_type, PackageType::Installer);
    assert_eq!(artifact.paths, vec![installer.clone()]);
    assert!(installer.is_file());

    let xpack = read_lines(&project.output().join("build/xpack.args"));
    let backend = xpack.iter().position(|a| a == "-backend").unwrap();
    assert_eq!(xpack[backend + 1], "excelsior-installer");
    let company = xpack.iter().position(|a| a == "-company").unwrap();
    assert_eq!(xpack[company + 1], "Example");
}

#[tokio::test]
async fn installer_picks_up_the_conventional_eula() {
    let jet = FakeJet::new(PRO_32);
    let project = Project::new();
    let eula = project.root().join("jetresources/eula.txt");
    std::fs::create_dir_all(eula.parent().unwrap()).unwrap();
    std::fs::write(&eula, "Terms of use\n").unwrap();
    let (ctx, _) = linux_ctx();

    BuildPipeline::new(
        project.settings(&jet, "packaging = \"excelsior-installer\""),
        ctx,
    )
    .run()
    .await
    .unwrap();

    let xpack = read_lines(&project.output().join("build/xpack.args"));
    let flag = xpack.iter().position(|a| a == "-eula").unwrap();
    assert_eq!(xpack[flag + 1], eula.display().to_string());
    assert!(!xpack.iter().any(|a| a == "-unicode-eula"));
}

#[tokio::test]
async fn app_bundle_falls_back_to_zip_off_macos() {
    let jet = FakeJet::new(PRO_32);
    let project = Project::new();
    let (ctx, sink) = linux_ctx();

    let artifact = BuildPipeline::new(
        project.settings(&jet, "packaging = \"osx-app-bundle\""),
        ctx,
    )
    .run()
    .await
    .unwrap();

    assert_eq!(artifact.package_type, PackageType::Zip);
    assert!(sink.contains(Level::Warn, "falling back to zip"));
}

#[tokio::test]
async fn compiler_failure_aborts_with_tool_output() {
    let jet = FakeJet::new(PRO_32);
    jet.fail_compilation();
    let project = Project::new();
    let (ctx, sink) = linux_ctx();

    let err = BuildPipeline::new(project.settings(&jet, ""), ctx)
        .run()
        .await
        .unwrap_err();

    match err {
        Error::CommandExit { context, code, .. } => {
            assert_eq!(context, "build failed");
            assert_eq!(code, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(sink.contains(Level::Error, "out of licenses"));
    assert!(!project.output().join("app").exists());
}

#[tokio::test]
async fn missing_main_jar_fails_before_any_tool_runs() {
    let jet = FakeJet::new(PRO_32);
    let project = Project::new();
    std::fs::remove_file(project.root().join("target/hello.jar")).unwrap();
    let (ctx, _) = linux_ctx();

    let err = BuildPipeline::new(project.settings(&jet, ""), ctx)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)), "{err}");
    assert!(!project.output().join("build/jc.args").exists());
}

#[tokio::test]
async fn global_optimizer_needs_a_usage_profile() {
    let jet = FakeJet::new(PRO_32);
    let project = Project::new();
    let (ctx, _) = linux_ctx();

    let err = BuildPipeline::new(project.settings(&jet, "global_optimizer = true"), ctx)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CapabilityRejected(_)), "{err}");
}

#[tokio::test]
async fn global_optimizer_is_dropped_on_64_bit() {
    let jet = FakeJet::new(ENTERPRISE_64);
    let project = Project::new();
    let (ctx, sink) = linux_ctx();

    BuildPipeline::new(project.settings(&jet, "global_optimizer = true"), ctx)
        .run()
        .await
        .unwrap();

    let prj = std::fs::read_to_string(project.output().join("build/Hello.prj")).unwrap();
    assert!(!prj.contains("-global+"));
    assert!(sink.contains(Level::Warn, "64-bit"));
}

#[tokio::test]
async fn test_run_records_profiles_used_by_the_next_build() {
    let jet = FakeJet::new(PRO_32);
    let project = Project::new();
    let (ctx, _) = linux_ctx();
    let settings = project.settings(&jet, r#"jvm_args = ["-Dhome=$(Root)"]"#);

    let code = test_run(&settings, &ctx).await.unwrap();
    assert_eq!(code, 0);

    let build = project.output().join("build");
    let args = read_lines(&build.join("xjava.args"));
    let startup = project.root().join("jetresources/hello.startup");
    assert_eq!(args[0], format!("-Djet.jit.profile.startup={}", startup.display()));
    assert!(args[1].starts_with("-Djet.usage.list="));
    assert_eq!(args[2], format!("-Dhome={}", build.display()));
    assert_eq!(&args[3..], ["-cp", "hello.jar:lib/util-1.0.jar", "com.example.Hello"]);
    assert!(startup.is_file());

    BuildPipeline::new(settings, ctx).run().await.unwrap();
    let prj = std::fs::read_to_string(build.join("Hello.prj")).unwrap();
    assert!(prj.contains(&format!("!module {}", startup.display())));
}

#[tokio::test]
async fn test_run_reports_a_failing_application_as_a_warning() {
    let jet = FakeJet::new(ENTERPRISE_64);
    let project = Project::new();
    let (ctx, sink) = ctx_with(Environment::inherit().with_var("XJAVA_EXIT", "5"));

    let code = test_run(&project.settings(&jet, ""), &ctx).await.unwrap();
    assert_eq!(code, 5);
    assert!(sink.contains(Level::Warn, "exit code 5"));

    let args = read_lines(&project.output().join("build/xjava.args"));
    assert!(!args.iter().any(|a| a.starts_with("-Djet.usage.list")));
}

#[tokio::test]
async fn test_run_rejects_tomcat_applications() {
    let jet = FakeJet::new(PRO_32);
    let project = Project::new();
    let (ctx, _) = linux_ctx();

    let err = test_run(&project.settings(&jet, "app_type = \"tomcat\""), &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn clean_removes_build_and_app_only() {
    let jet = FakeJet::new(PRO_32);
    let project = Project::new();
    let (ctx, _) = linux_ctx();
    BuildPipeline::new(project.settings(&jet, ""), ctx)
        .run()
        .await
        .unwrap();

    clean(&project.output()).await.unwrap();
    assert!(!project.output().join("build").exists());
    assert!(!project.output().join("app").exists());
    assert!(project.output().join("hello.zip").is_file());
}
