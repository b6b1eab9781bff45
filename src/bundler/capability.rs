//! Feature gating by detected toolchain capabilities.
//!
//! Each gate is a pure function of the requested feature, the toolchain facts and the
//! host platform. [`apply`] runs all of them before the compiler invocation is built:
//! a rejection aborts the build, a downgrade is logged and switches the feature off.

use crate::bundler::{
    context::Context,
    error::{Error, Result},
    os::OsCapabilities,
    settings::{AppType, CompactProfile, Packaging, RuntimeSettings, Settings, SlimDownSettings},
    toolchain::Edition,
};
use std::path::{Path, PathBuf};

/// First release supporting compact profiles and relocatable runtimes (11.3).
pub const RUNTIME_OPTIONS_MIN_VERSION: i32 = 1130;

/// Toolchain facts the gates decide on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolFacts {
    pub version: i32,
    pub edition: Edition,
    pub is_64_bit: bool,
}

impl ToolFacts {
    fn is_standard(&self) -> bool {
        self.edition == Edition::Standard
    }
}

/// Decision for one feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Requested and available.
    Enabled,
    /// Not requested, or not applicable on this host. Dropped silently.
    Off,
    /// Requested but unavailable; the build continues without it.
    DisabledWithWarning(String),
    /// Requested but impossible; the build fails.
    Rejected(String),
}

impl GateOutcome {
    /// Enabled → true, off → false, downgrade → warn and false, rejection → error.
    pub fn settle(self, ctx: &Context) -> Result<bool> {
        match self {
            GateOutcome::Enabled => Ok(true),
            GateOutcome::Off => Ok(false),
            GateOutcome::DisabledWithWarning(reason) => {
                ctx.warn(&reason);
                Ok(false)
            }
            GateOutcome::Rejected(reason) => Err(Error::CapabilityRejected(reason)),
        }
    }
}

/// Global Optimizer: 32-bit non-Standard toolchains only, needs a usage profile.
pub fn global_optimizer(requested: bool, facts: &ToolFacts, usage_profile: &Path) -> GateOutcome {
    if !requested {
        return GateOutcome::Off;
    }
    if facts.is_64_bit {
        return GateOutcome::DisabledWithWarning(
            "The Global Optimizer is not available in the 64-bit version of Excelsior JET, \
             building without it"
                .into(),
        );
    }
    if facts.is_standard() {
        return GateOutcome::DisabledWithWarning(
            "The Global Optimizer is not available in Excelsior JET Standard Edition, \
             building without it"
                .into(),
        );
    }
    if !usage_profile.is_file() {
        return GateOutcome::Rejected(format!(
            "The Global Optimizer needs the execution profile {}; run `jet-bundler test-run` first",
            usage_profile.display()
        ));
    }
    GateOutcome::Enabled
}

/// Java Runtime Slim-Down: same availability as the Global Optimizer, plus a
/// mandatory, valid base URL.
pub fn slim_down(slim_down: Option<&SlimDownSettings>, facts: &ToolFacts) -> GateOutcome {
    let Some(slim_down) = slim_down else {
        return GateOutcome::Off;
    };
    if facts.is_64_bit || facts.is_standard() {
        return GateOutcome::DisabledWithWarning(
            "Java Runtime Slim-Down needs the Global Optimizer, which is only available in the \
             32-bit Professional or Enterprise Edition, building without it"
                .into(),
        );
    }
    match slim_down.detached_base_url.as_deref().map(str::trim) {
        None | Some("") => GateOutcome::Rejected(
            "Java Runtime Slim-Down requires `runtime.slim_down.detached_base_url`".into(),
        ),
        Some(raw) => match url::Url::parse(raw) {
            Ok(_) => GateOutcome::Enabled,
            Err(e) => GateOutcome::Rejected(format!(
                "`runtime.slim_down.detached_base_url` is not a valid URL ({raw}): {e}"
            )),
        },
    }
}

/// Console hiding exists on Windows only.
pub fn hide_console(requested: bool, os: OsCapabilities) -> GateOutcome {
    if requested && os.is_windows() {
        GateOutcome::Enabled
    } else {
        GateOutcome::Off
    }
}

/// Version-information resources exist on Windows only and not in Standard Edition.
pub fn version_info(requested: bool, facts: &ToolFacts, os: OsCapabilities) -> GateOutcome {
    if !requested || !os.is_windows() {
        return GateOutcome::Off;
    }
    if facts.is_standard() {
        return GateOutcome::DisabledWithWarning(
            "Windows version information is not available in Excelsior JET Standard Edition"
                .into(),
        );
    }
    GateOutcome::Enabled
}

/// Packaging formats tied to a platform fall back to zip elsewhere.
///
/// `requested` must already have `native-bundle` resolved.
pub fn packaging(requested: Packaging, os: OsCapabilities) -> GateOutcome {
    match requested {
        Packaging::ExcelsiorInstaller if os.is_macos() => GateOutcome::DisabledWithWarning(
            "Excelsior Installer is not available on OS X, falling back to zip".into(),
        ),
        Packaging::OsxAppBundle if !os.is_macos() => GateOutcome::DisabledWithWarning(format!(
            "OS X application bundles cannot be created on {}, falling back to zip",
            os.family()
        )),
        _ => GateOutcome::Enabled,
    }
}

/// Tomcat web applications need Professional Edition or better.
pub fn tomcat(app_type: AppType, facts: &ToolFacts) -> GateOutcome {
    match app_type {
        AppType::Plain => GateOutcome::Off,
        AppType::Tomcat if facts.is_standard() => GateOutcome::Rejected(
            "Tomcat web applications are not supported by Excelsior JET Standard Edition".into(),
        ),
        AppType::Tomcat => GateOutcome::Enabled,
    }
}

/// Compact profiles and runtime relocation need 11.3 or newer.
pub fn runtime_options(runtime: &RuntimeSettings, facts: &ToolFacts) -> GateOutcome {
    let requested = runtime.profile != CompactProfile::Auto || runtime.location.is_some();
    if !requested {
        return GateOutcome::Off;
    }
    if facts.version < RUNTIME_OPTIONS_MIN_VERSION {
        return GateOutcome::Rejected(format!(
            "`runtime.profile` and `runtime.location` need Excelsior JET 11.3 or newer, found {}",
            facts.version
        ));
    }
    GateOutcome::Enabled
}

/// Data protection is not part of Standard Edition.
pub fn protect_data(requested: bool, facts: &ToolFacts) -> GateOutcome {
    if !requested {
        return GateOutcome::Off;
    }
    if facts.is_standard() {
        return GateOutcome::DisabledWithWarning(
            "Data protection is not available in Excelsior JET Standard Edition".into(),
        );
    }
    GateOutcome::Enabled
}

/// A startup profile is used when one has been recorded.
pub fn startup_profile(profile: &Path) -> GateOutcome {
    if profile.is_file() {
        GateOutcome::Enabled
    } else {
        GateOutcome::Off
    }
}

/// Effective feature set after gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Features {
    pub packaging: Packaging,
    pub tomcat: bool,
    pub runtime_options: bool,
    pub slim_down: bool,
    pub global_optimizer: bool,
    pub hide_console: bool,
    pub version_info: bool,
    pub protect_data: bool,
    /// Startup profile to compile in, if recorded.
    pub startup_profile: Option<PathBuf>,
    /// Usage profile for the Global Optimizer, if enabled.
    pub usage_profile: Option<PathBuf>,
}

/// Run every gate against the configuration.
pub fn apply(settings: &Settings, facts: &ToolFacts, ctx: &Context) -> Result<Features> {
    let os = ctx.os();
    let build = &settings.build;

    let requested_packaging = build.packaging.resolve_native(os.is_macos());
    let packaging = if packaging(requested_packaging, os).settle(ctx)? {
        requested_packaging
    } else {
        Packaging::Zip
    };

    let tomcat = tomcat(build.app_type, facts).settle(ctx)?;
    let runtime_options = runtime_options(&settings.runtime, facts).settle(ctx)?;

    let slim_down = slim_down(settings.runtime.slim_down.as_ref(), facts).settle(ctx)?;
    let usage_profile = settings.usage_profile();
    let global_optimizer =
        global_optimizer(build.global_optimizer || slim_down, facts, &usage_profile).settle(ctx)?;

    let hide_console = hide_console(build.hide_console, os).settle(ctx)?;
    let version_info =
        version_info(settings.windows_version_info.enabled, facts, os).settle(ctx)?;
    let protect_data = protect_data(build.protect_data, facts).settle(ctx)?;

    let startup = settings.startup_profile();
    let startup_profile = startup_profile(&startup).settle(ctx)?.then_some(startup);

    Ok(Features {
        packaging,
        tomcat,
        runtime_options,
        slim_down,
        global_optimizer,
        hide_console,
        version_info,
        protect_data,
        startup_profile,
        usage_profile: global_optimizer.then_some(usage_profile),
    })
}
