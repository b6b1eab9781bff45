//! Copying the application and its dependencies into the build directory.

use super::layout::OutputLayout;
use crate::bundler::{
    context::Context,
    error::{Error, Result},
    settings::Settings,
    toolchain::Dependency,
    utils::fs::{copy_dir_if_changed, copy_file_if_changed},
};
use std::{collections::HashSet, path::{Path, PathBuf}};

pub const TOMCAT_HOME_PROPERTY: &str = "tomcat.home";
pub const TOMCAT_HOME_ENV: &str = "TOMCAT_HOME";
pub const CATALINA_HOME_ENV: &str = "CATALINA_HOME";

const WEBAPPS_DIR: &str = "webapps";

/// Outcome of staging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingReport {
    /// Classpath entries relative to the build directory, in order.
    pub dependencies: Vec<Dependency>,
    /// Files actually copied; zero when everything was up to date.
    pub copied: usize,
}

/// Stage a plain application: the main jar goes to `build/`, dependencies to
/// `build/lib/`.
pub async fn stage_dependencies(
    settings: &Settings,
    layout: &OutputLayout,
    ctx: &Context,
) -> Result<StagingReport> {
    let build_dir = layout.build_dir();
    let mut report = StagingReport::default();
    let mut seen = HashSet::new();

    let main_jar = &settings.build.main_jar;
    let main_name = file_name(main_jar)?;
    if copy_file_if_changed(main_jar, &build_dir.join(&main_name)).await? {
        report.copied += 1;
    }
    report.dependencies.push(Dependency::new(&main_name, false));

    for dependency in &settings.dependencies {
        if dependency.path.is_dir() {
            ctx.warn(format!(
                "Skipping dependency {}: directories cannot be compiled, package them as a jar",
                dependency.path.display()
            ));
            continue;
        }

        let name = file_name(&dependency.path)?;
        if !seen.insert(name.clone()) {
            return Err(Error::Config(format!(
                "two dependencies are named {name}; rename one of them"
            )));
        }

        let relative = OutputLayout::relative_lib_path(&name);
        if copy_file_if_changed(&dependency.path, &build_dir.join(&relative)).await? {
            report.copied += 1;
        }
        report.dependencies.push(Dependency::new(
            relative,
            dependency.is_library(&settings.project.group_id),
        ));
    }

    log::info!(
        "Staged {} classpath entries ({} copied)",
        report.dependencies.len(),
        report.copied
    );
    Ok(report)
}

/// Locate the Tomcat installation: config, then the `tomcat.home` property, then
/// `TOMCAT_HOME`, then `CATALINA_HOME`. It must contain `webapps/`.
pub fn resolve_tomcat_home(settings: &Settings, ctx: &Context) -> Result<PathBuf> {
    let home = settings
        .tomcat
        .tomcat_home
        .clone()
        .or_else(|| ctx.property(TOMCAT_HOME_PROPERTY).map(PathBuf::from))
        .or_else(|| ctx.var(TOMCAT_HOME_ENV).map(PathBuf::from))
        .or_else(|| ctx.var(CATALINA_HOME_ENV).map(PathBuf::from))
        .ok_or_else(|| {
            Error::Config(format!(
                "Tomcat home is not set; use `tomcat.tomcat_home`, -D{TOMCAT_HOME_PROPERTY}=..., \
                 {TOMCAT_HOME_ENV} or {CATALINA_HOME_ENV}"
            ))
        })?;

    if !home.join(WEBAPPS_DIR).is_dir() {
        return Err(Error::Config(format!(
            "{} is not a Tomcat installation: {WEBAPPS_DIR}/ not found",
            home.display()
        )));
    }
    Ok(home)
}

/// File name the war is deployed under, `.war` appended if missing.
pub fn war_deploy_name(settings: &Settings) -> Result<String> {
    let name = match &settings.tomcat.war_deploy_name {
        Some(name) => name.clone(),
        None => file_name(&settings.build.main_jar)?,
    };
    Ok(if name.ends_with(".war") {
        name
    } else {
        format!("{name}.war")
    })
}

/// Stage a Tomcat web application: the installation is copied to `build/tomcat` and
/// the war into its `webapps/`. The war is the only classpath entry.
pub async fn stage_tomcat(
    settings: &Settings,
    tomcat_home: &Path,
    layout: &OutputLayout,
) -> Result<StagingReport> {
    let tomcat_dir = layout.tomcat_dir();
    let mut copied = copy_dir_if_changed(tomcat_home, &tomcat_dir).await?;

    let war = Path::new(OutputLayout::relative_tomcat_dir())
        .join(WEBAPPS_DIR)
        .join(war_deploy_name(settings)?);
    if copy_file_if_changed(&settings.build.main_jar, &layout.build_dir().join(&war)).await? {
        copied += 1;
    }

    log::info!("Staged Tomcat from {} ({copied} copied)", tomcat_home.display());
    Ok(StagingReport {
        dependencies: vec![Dependency::new(war, false)],
        copied,
    })
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Config(format!("{} has no file name", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{
        context::{CollectingSink, Environment, Level},
        os::{OsCapabilities, PlatformFamily},
        settings::{DependencySettings, SettingsBuilder},
    };
    use std::sync::Arc;

    fn settings(base: &Path, extra: &str) -> Settings {
        SettingsBuilder::new()
            .source(format!(
                r#"
                [project]
                group_id = "com.example"
                artifact_id = "hello"

                [build]
                main_jar = "hello.jar"
                main_class = "com.example.Hello"
                {extra}
                "#
            ))
            .base_dir(base)
            .build()
            .unwrap()
    }

    fn ctx(env: Environment) -> (Context, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let ctx = Context::new(sink.clone(), OsCapabilities::new(PlatformFamily::Linux), env);
        (ctx, sink)
    }

    #[tokio::test]
    async fn stages_main_jar_and_libraries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.jar"), b"main").unwrap();
        std::fs::write(dir.path().join("util.jar"), b"util").unwrap();
        std::fs::write(dir.path().join("guava.jar"), b"guava").unwrap();
        std::fs::create_dir(dir.path().join("classes")).unwrap();

        let mut settings = settings(dir.path(), "");
        settings.dependencies = vec![
            DependencySettings {
                path: dir.path().join("util.jar"),
                group_id: Some("com.example".into()),
                is_library: None,
            },
            DependencySettings {
                path: dir.path().join("classes"),
                group_id: None,
                is_library: None,
            },
            DependencySettings {
                path: dir.path().join("guava.jar"),
                group_id: Some("com.google.guava".into()),
                is_library: None,
            },
        ];
        let layout = OutputLayout::new(dir.path().join("out"));
        let (ctx, sink) = ctx(Environment::empty());

        let report = stage_dependencies(&settings, &layout, &ctx).await.unwrap();
        assert_eq!(report.copied, 3);
        assert_eq!(
            report.dependencies,
            vec![
                Dependency::new("hello.jar", false),
                Dependency::new("lib/util.jar", false),
                Dependency::new("lib/guava.jar", true),
            ]
        );
        assert!(layout.lib_dir().join("guava.jar").is_file());
        assert!(sink.contains(Level::Warn, "classes"));

        let again = stage_dependencies(&settings, &layout, &ctx).await.unwrap();
        assert_eq!(again.copied, 0);
    }

    #[tokio::test]
    async fn duplicate_file_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::create_dir_all(dir.path().join("b")).unwrap();
        std::fs::write(dir.path().join("hello.jar"), b"main").unwrap();
        std::fs::write(dir.path().join("a/dup.jar"), b"a").unwrap();
        std::fs::write(dir.path().join("b/dup.jar"), b"b").unwrap();

        let mut settings = settings(dir.path(), "");
        for sub in ["a", "b"] {
            settings.dependencies.push(DependencySettings {
                path: dir.path().join(sub).join("dup.jar"),
                group_id: None,
                is_library: None,
            });
        }
        let (ctx, _) = ctx(Environment::empty());
        let err = stage_dependencies(&settings, &OutputLayout::new(dir.path().join("out")), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn library_may_share_the_main_jar_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("repo")).unwrap();
        std::fs::write(dir.path().join("hello.jar"), b"main").unwrap();
        std::fs::write(dir.path().join("repo/hello.jar"), b"other").unwrap();

        let mut settings = settings(dir.path(), "");
        settings.dependencies.push(DependencySettings {
            path: dir.path().join("repo/hello.jar"),
            group_id: None,
            is_library: None,
        });
        let layout = OutputLayout::new(dir.path().join("out"));
        let (ctx, _) = ctx(Environment::empty());

        let report = stage_dependencies(&settings, &layout, &ctx).await.unwrap();
        let paths: Vec<_> = report
            .dependencies
            .iter()
            .map(|dependency| dependency.path.clone())
            .collect();
        assert_eq!(paths, vec![PathBuf::from("hello.jar"), PathBuf::from("lib/hello.jar")]);
        assert_eq!(std::fs::read(layout.lib_dir().join("hello.jar")).unwrap(), b"other");
        assert_eq!(std::fs::read(layout.build_dir().join("hello.jar")).unwrap(), b"main");
    }

    #[test]
    fn tomcat_home_lookup_order() {
        let dir = tempfile::tempdir().unwrap();
        let from_env = dir.path().join("catalina");
        std::fs::create_dir_all(from_env.join("webapps")).unwrap();
        let settings = settings(dir.path(), "app_type = \"tomcat\"");

        let (ctx_none, _) = ctx(Environment::empty());
        assert!(resolve_tomcat_home(&settings, &ctx_none).is_err());

        let (ctx_env, _) = ctx(Environment::empty().with_var(
            CATALINA_HOME_ENV,
            from_env.to_string_lossy(),
        ));
        assert_eq!(resolve_tomcat_home(&settings, &ctx_env).unwrap(), from_env);

        let (ctx_prop, _) = ctx(Environment::empty()
            .with_var(CATALINA_HOME_ENV, from_env.to_string_lossy())
            .with_property(TOMCAT_HOME_PROPERTY, dir.path().to_string_lossy()));
        assert!(resolve_tomcat_home(&settings, &ctx_prop).is_err());
    }

    #[test]
    fn war_name_gets_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(dir.path(), "");
        settings.build.main_jar = dir.path().join("shop.war");
        assert_eq!(war_deploy_name(&settings).unwrap(), "shop.war");
        settings.tomcat.war_deploy_name = Some("ROOT".into());
        assert_eq!(war_deploy_name(&settings).unwrap(), "ROOT.war");
    }

    #[tokio::test]
    async fn tomcat_staging_deploys_the_war() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("tomcat");
        std::fs::create_dir_all(home.join("webapps")).unwrap();
        std::fs::create_dir_all(home.join("conf")).unwrap();
        std::fs::write(home.join("conf/server.xml"), b"<Server/>").unwrap();
        std::fs::write(dir.path().join("shop.war"), b"war").unwrap();

        let mut settings = settings(dir.path(), "");
        settings.build.main_jar = dir.path().join("shop.war");
        let layout = OutputLayout::new(dir.path().join("out"));

        let report = stage_tomcat(&settings, &home, &layout).await.unwrap();
        assert_eq!(report.copied, 2);
        assert_eq!(
            report.dependencies,
            vec![Dependency::new("tomcat/webapps/shop.war", false)]
        );
        assert!(layout.tomcat_dir().join("webapps/shop.war").is_file());
        assert_eq!(stage_tomcat(&settings, &home, &layout).await.unwrap().copied, 0);
    }
}
