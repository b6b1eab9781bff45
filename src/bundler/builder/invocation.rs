//! Assembling the compiler invocation from settings and gated features.

use super::layout::OutputLayout;
use crate::bundler::{
    capability::Features,
    context::Context,
    error::{Error, Result},
    settings::{CompactProfile, Settings, StackTraceSupport},
    toolchain::{Dependency, project_file},
};
use chrono::Datelike;
use std::path::PathBuf;

/// What the executable starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    /// Main class in `/`-separated form.
    MainClass(String),
    /// Tomcat web application in `build/tomcat`.
    Tomcat,
}

/// Everything `jc` is told about one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerInvocation {
    pub launch: Launch,
    pub output_name: String,
    /// Project file options, in emission order.
    pub flags: Vec<String>,
    pub dependencies: Vec<Dependency>,
    /// Auxiliary modules: icon, usage profile, startup profile.
    pub modules: Vec<PathBuf>,
    /// JVM arguments baked into the executable.
    pub jvm_args: Vec<String>,
}

impl CompilerInvocation {
    /// Build the invocation. Features must already be gated.
    pub fn assemble(
        settings: &Settings,
        features: &Features,
        dependencies: Vec<Dependency>,
        ctx: &Context,
    ) -> Result<Self> {
        let build = &settings.build;
        let os = ctx.os();

        let launch = if features.tomcat {
            Launch::Tomcat
        } else {
            let main_class = build
                .main_class
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| Error::Config("`build.main_class` is required".into()))?;
            Launch::MainClass(normalize_main_class(main_class))
        };
        let output_name = output_name(settings, &launch)?;

        let mut flags = Vec::new();
        if features.hide_console {
            flags.push("-gui+".to_string());
        }
        match &launch {
            Launch::MainClass(main) => flags.push(format!("-main={main}")),
            Launch::Tomcat => {
                flags.push("-apptype=tomcat".to_string());
                flags.push(format!("-appdir={}", OutputLayout::relative_tomcat_dir()));
            }
        }
        flags.push(format!("-outputname={output_name}"));
        flags.push("-decor=ht".to_string());

        if features.version_info {
            flags.extend(version_info_flags(settings, ctx));
        }
        if features.global_optimizer {
            flags.push("-global+".to_string());
        }
        if build.multi_app {
            flags.push("-multiapp+".to_string());
        }
        match build.stack_trace_support {
            StackTraceSupport::Minimal => {}
            StackTraceSupport::Full => flags.push("-genstacktrace+".to_string()),
            StackTraceSupport::None => flags.push("-disablestacktrace+".to_string()),
        }
        if let Some((inline, inline_to)) = build.inline_expansion.limits() {
            flags.push(format!("-inlinelimit={inline}"));
            flags.push(format!("-inlinetolimit={inline_to}"));
        }
        if features.protect_data {
            flags.push(format!("-cryptseed={}", settings.crypt_seed()));
        }
        if let Some(trial) = &settings.trial_version {
            if let Some(expire) = trial
                .expire_in_days
                .map(|days| days.to_string())
                .or_else(|| trial.expire_date.clone())
            {
                flags.push(format!("-expire={expire}"));
            }
            if let Some(message) = &trial.expire_message {
                flags.push(format!("-expiremsg={message}"));
            }
        }

        let runtime = &settings.runtime;
        if let Some(flavor) = runtime.flavor {
            flags.push(format!("-jetrt={}", flavor.as_str()));
        }
        if features.runtime_options {
            if let Some(location) = &runtime.location {
                flags.push(format!("-jetrtlocation={location}"));
            }
            if runtime.profile != CompactProfile::Auto {
                flags.push(format!("-compactprofile={}", runtime.profile.as_str()));
            }
        }
        if let Some(reduction) = runtime.disk_footprint_reduction {
            flags.push(format!("-diskfootprintreduction={}", reduction.as_str()));
        }

        if build.profile_startup {
            flags.push("-saprofmode=ALWAYS".to_string());
            flags.push(format!("-saproftimeout={}", build.profile_startup_timeout));
        }

        flags.extend(build.compiler_options.iter().cloned());

        let mut modules = Vec::new();
        if os.is_windows()
            && let Some(icon) = &build.icon
            && icon.is_file()
        {
            modules.push(icon.clone());
        }
        if let Some(usage) = &features.usage_profile {
            modules.push(usage.clone());
        }
        if let Some(startup) = &features.startup_profile {
            modules.push(startup.clone());
        }

        Ok(Self {
            launch,
            output_name,
            flags,
            dependencies,
            modules,
            jvm_args: build.jvm_args.clone(),
        })
    }

    /// Arguments for `jc`, run in the build directory.
    pub fn compiler_args(&self) -> Vec<String> {
        let mut args = vec!["=p".to_string(), format!("{}.prj", self.output_name)];
        if !self.jvm_args.is_empty() {
            args.push(format!("-jetvmprop={}", self.jvm_args.join(" ")));
        }
        args
    }

    /// Write `build/<outputName>.prj`.
    pub async fn write_project_file(&self, layout: &OutputLayout) -> Result<PathBuf> {
        let path = layout.project_file(&self.output_name);
        project_file::write(&path, &self.flags, &self.dependencies, &self.modules).await?;
        Ok(path)
    }
}

/// `com.example.App` → `com/example/App`.
pub fn normalize_main_class(main_class: &str) -> String {
    main_class.trim().replace('.', "/")
}

/// Explicit output name, else the simple main class name, else the war stem.
pub fn output_name(settings: &Settings, launch: &Launch) -> Result<String> {
    if let Some(name) = settings.build.output_name.as_deref().filter(|n| !n.is_empty()) {
        return Ok(name.to_string());
    }
    match launch {
        Launch::MainClass(main) => Ok(main.rsplit('/').next().unwrap_or(main).to_string()),
        Launch::Tomcat => settings
            .build
            .main_jar
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::Config(format!(
                    "cannot derive an output name from {}",
                    settings.build.main_jar.display()
                ))
            }),
    }
}

/// Coerce a version to the `v1.v2.v3.v4` form Windows resources require.
///
/// Each of the first four dot-separated parts is decoded as a number (decimal, `0x`,
/// `0X` or `#` hex, leading-`0` octal); a part that does not decode keeps the number
/// before its first `-`, else becomes `0`. Negative parts become `0`. Missing parts
/// are `0`.
pub fn coerce_version(version: &str) -> String {
    let mut parts = [0u32; 4];
    for (slot, raw) in parts.iter_mut().zip(version.split('.')) {
        *slot = decode_part(raw).unwrap_or_else(|| match raw.find('-') {
            Some(pos) if pos > 0 => decode_part(&raw[..pos]).unwrap_or(0),
            _ => 0,
        });
    }
    parts.map(|p| p.to_string()).join(".")
}

fn decode_part(raw: &str) -> Option<u32> {
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let (digits, radix) = if let Some(hex) = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .or_else(|| raw.strip_prefix('#'))
    {
        (hex, 16)
    } else if raw.len() > 1 && raw.starts_with('0') {
        (&raw[1..], 8)
    } else {
        (raw, 10)
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

/// `Copyright \x00a9 [<inception>,]<year> <vendor>`. The escape is left for the
/// compiler to expand.
pub fn default_copyright(inception_year: Option<&str>, current_year: i32, vendor: &str) -> String {
    let years = match inception_year.map(str::trim).filter(|y| !y.is_empty()) {
        Some(inception) => format!("{inception},{current_year}"),
        None => current_year.to_string(),
    };
    format!("Copyright \\x00a9 {years} {vendor}")
}

fn version_info_flags(settings: &Settings, ctx: &Context) -> Vec<String> {
    let info = &settings.windows_version_info;
    let vendor = settings.project.vendor();
    let product = settings.project.product();

    let requested = info
        .version
        .as_deref()
        .unwrap_or_else(|| settings.project.version());
    let version = coerce_version(requested);
    if version != requested {
        ctx.warn(format!(
            "Version `{requested}` is not in v1.v2.v3.v4 form, using {version} for the executable"
        ));
    }

    let copyright = info.copyright.clone().unwrap_or_else(|| {
        default_copyright(
            settings.project.inception_year.as_deref(),
            chrono::Local::now().year(),
            &vendor,
        )
    });
    let description = info.description.as_deref().unwrap_or(product);

    vec![
        format!("-versioninfocompanyname={vendor}"),
        format!("-versioninfoproductname={product}"),
        format!("-versioninfoproductversion={version}"),
        format!("-versioninfolegalcopyright={copyright}"),
        format!("-versioninfofiledescription={description}"),
    ]
}
