//! create-next-app argument construction.
//!
//! Every scaffold feature contributes exactly one flag: its enabled form or
//! its disabled form. The package manager contributes its `--use-*` flag.

use crate::project::{Feature, ProjectConfig};

/// Flag emitted for a scaffold feature in the given state.
///
/// Returns `None` for features that are not create-next-app options.
pub fn flag_for(feature: Feature, enabled: bool) -> Option<&'static str> {
    let (on, off) = match feature {
        Feature::Typescript => ("--typescript", "--javascript"),
        Feature::Tailwind => ("--tailwind", "--no-tailwind"),
        Feature::Eslint => ("--eslint", "--no-eslint"),
        Feature::SrcDir => ("--src-dir", "--no-src-dir"),
        Feature::AppRouter => ("--app", "--no-app"),
        Feature::ImportAlias => ("--import-alias", "--no-import-alias"),
        Feature::Turbopack => ("--turbopack", "--no-turbopack"),
        _ => return None,
    };
    Some(if enabled { on } else { off })
}

/// Flags for `create-next-app`, without the runner or the project name.
pub fn flags(config: &ProjectConfig) -> Vec<String> {
    let mut args = Vec::new();

    for feature in Feature::SCAFFOLD {
        let enabled = config.features.is_enabled(feature);
        if let Some(flag) = flag_for(feature, enabled) {
            args.push(flag.to_string());
            if feature == Feature::ImportAlias && enabled {
                args.push(config.import_alias.clone());
            }
        }
    }

    args.push(config.package_manager.use_flag().to_string());
    args
}

/// Full argument list after the runner: package spec, project name, flags.
pub fn args(config: &ProjectConfig, runner_args: &[String], package: &str) -> Vec<String> {
    let mut out: Vec<String> = runner_args.to_vec();
    out.push(package.to_string());
    out.push(config.name.trim().to_string());
    out.extend(flags(config));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{FeatureFlags, PackageManager};

    fn demo() -> ProjectConfig {
        ProjectConfig::new("demo", "/tmp/demo")
    }

    #[test]
    fn typescript_and_tailwind_with_npm() {
        let mut config = demo();
        config.features = FeatureFlags::none();
        config.features.typescript = true;
        config.features.tailwind = true;

        let flags = flags(&config);
        assert!(flags.contains(&"--typescript".to_string()));
        assert!(flags.contains(&"--tailwind".to_string()));
        assert_eq!(flags.last().map(String::as_str), Some("--use-npm"));
        assert!(!flags.contains(&"--javascript".to_string()));
    }

    #[test]
    fn every_scaffold_feature_emits_exactly_one_form() {
        // Walk every on/off combination of the scaffold features.
        for mask in 0u32..(1 << Feature::SCAFFOLD.len()) {
            let mut config = demo();
            config.features = FeatureFlags::none();
            for (bit, feature) in Feature::SCAFFOLD.iter().enumerate() {
                config.features.set(*feature, mask & (1 << bit) != 0);
            }

            let flags = flags(&config);
            for feature in Feature::SCAFFOLD {
                let on = flag_for(feature, true).unwrap();
                let off = flag_for(feature, false).unwrap();
                let on_count = flags.iter().filter(|f| *f == on).count();
                let off_count = flags.iter().filter(|f| *f == off).count();

                if config.features.is_enabled(feature) {
                    assert_eq!((on_count, off_count), (1, 0), "{} mask {:b}", feature, mask);
                } else {
                    assert_eq!((on_count, off_count), (0, 1), "{} mask {:b}", feature, mask);
                }
            }

            let alias_value = usize::from(config.features.import_alias);
            assert_eq!(flags.len(), Feature::SCAFFOLD.len() + 1 + alias_value);
        }
    }

    #[test]
    fn library_features_never_reach_scaffold_flags() {
        let mut config = demo();
        config.features.redux = true;
        config.features.prisma = true;
        config.features.shadcn = true;

        let with_libs = flags(&config);
        assert_eq!(with_libs, flags(&demo()));
    }

    #[test]
    fn import_alias_value_follows_flag() {
        let mut config = demo();
        config.import_alias = "~/*".to_string();
        let flags = flags(&config);
        let pos = flags.iter().position(|f| f == "--import-alias").unwrap();
        assert_eq!(flags[pos + 1], "~/*");
    }

    #[test]
    fn package_manager_flag_changes_with_choice() {
        let mut config = demo();
        config.package_manager = PackageManager::Yarn;
        assert!(flags(&config).contains(&"--use-yarn".to_string()));
        config.package_manager = PackageManager::Pnpm;
        assert!(flags(&config).contains(&"--use-pnpm".to_string()));
    }

    #[test]
    fn args_put_package_and_name_first() {
        let runner = vec!["--yes".to_string()];
        let args = args(&demo(), &runner, "create-next-app@latest");
        assert_eq!(&args[..3], &["--yes", "create-next-app@latest", "demo"]);
    }
}
