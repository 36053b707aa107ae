//! Name-keyed table of distro implementations.

use super::{BitsyDistro, DistroOps};
use crate::config::{DistroConfig, SystemConfig};
use crate::errors::{DistroError, DistroResult};
use bitsy_hal::os_release::parse_os_release_info;
use bitsy_hal::SystemHal;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;

pub type DistroFactory = fn(DistroConfig, Arc<dyn SystemHal>) -> Box<dyn DistroOps>;

static BUILTIN: Lazy<DistroRegistry> = Lazy::new(DistroRegistry::with_builtins);

#[derive(Clone, Default)]
pub struct DistroRegistry {
    factories: BTreeMap<String, DistroFactory>,
}

impl DistroRegistry {
    /// Registry holding every distro shipped with this crate.
    pub fn builtin() -> &'static DistroRegistry {
        &BUILTIN
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::default();
        registry.register(BitsyDistro::NAME, |cfg, hal| {
            Box::new(BitsyDistro::new(cfg, hal))
        });
        registry
    }

    /// Add or replace the factory for `name`.
    pub fn register(&mut self, name: &str, factory: DistroFactory) {
        self.factories.insert(name.to_ascii_lowercase(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_ascii_lowercase())
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn create(
        &self,
        name: &str,
        system: SystemConfig,
        hal: Arc<dyn SystemHal>,
    ) -> DistroResult<Box<dyn DistroOps>> {
        let key = name.to_ascii_lowercase();
        let factory = self
            .factories
            .get(&key)
            .ok_or_else(|| DistroError::UnknownDistro(name.to_string()))?;
        log::debug!("Creating distro {}", key);
        Ok(factory(DistroConfig::new(key, system), hal))
    }

    /// Registered distro name matching the `ID=` of an os-release file.
    pub fn detect(&self, os_release_text: &str) -> Option<&str> {
        let id = parse_os_release_info(os_release_text).id?;
        self.factories
            .get_key_value(&id)
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunOutcome;
    use crate::system_config::packages::ExtraArgs;
    use crate::system_config::pkglist::PackageSpec;
    use bitsy_hal::FakeHal;
    use std::path::Path;

    struct NullDistro(DistroConfig);

    impl DistroOps for NullDistro {
        fn config(&self) -> &DistroConfig {
            &self.0
        }
        fn osfamily(&self) -> &str {
            "null"
        }
        fn apply_locale(&self, _: &str, _: Option<&Path>) -> DistroResult<()> {
            Ok(())
        }
        fn package_command(
            &self,
            _: &str,
            _: Option<&ExtraArgs>,
            _: &[PackageSpec],
        ) -> DistroResult<()> {
            Ok(())
        }
        fn set_timezone(&self, _: &str) -> DistroResult<()> {
            Ok(())
        }
        fn update_package_sources(&self) -> DistroResult<RunOutcome> {
            Ok(RunOutcome::Skipped)
        }
        fn read_hostname(&self, _: &Path, default: Option<&str>) -> Option<String> {
            default.map(String::from)
        }
        fn write_hostname(&self, _: &str, _: &Path) -> DistroResult<()> {
            Ok(())
        }
    }

    #[test]
    fn builtin_knows_bitsy() {
        let registry = DistroRegistry::builtin();
        assert_eq!(registry.names(), vec!["bitsy"]);

        let distro = registry
            .create("Bitsy", SystemConfig::default(), Arc::new(FakeHal::new()))
            .unwrap();
        assert_eq!(distro.name(), "bitsy");
        assert_eq!(distro.osfamily(), "bitsy");
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = DistroRegistry::builtin()
            .create("gentoo", SystemConfig::default(), Arc::new(FakeHal::new()))
            .err()
            .unwrap();
        assert!(matches!(err, DistroError::UnknownDistro(ref n) if n == "gentoo"));
    }

    #[test]
    fn register_adds_a_distro() {
        let mut registry = DistroRegistry::with_builtins();
        registry.register("null", |cfg, _| Box::new(NullDistro(cfg)));

        assert!(registry.contains("NULL"));
        assert_eq!(registry.names(), vec!["bitsy", "null"]);
        let distro = registry
            .create("null", SystemConfig::default(), Arc::new(FakeHal::new()))
            .unwrap();
        assert_eq!(distro.osfamily(), "null");
        assert_eq!(distro.default_locale(), "en_US.UTF-8");
    }

    #[test]
    fn detect_by_os_release_id() {
        let registry = DistroRegistry::builtin();
        let text = "NAME=\"Bitsy Linux\"\nID=\"bitsy\"\nVERSION_ID=4.0\n";
        assert_eq!(registry.detect(text), Some("bitsy"));
        assert_eq!(registry.detect("ID=fedora\n"), None);
        assert_eq!(registry.detect("NAME=nothing\n"), None);
    }
}
