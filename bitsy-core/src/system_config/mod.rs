pub mod hostname;
pub mod hostname_conf;
pub mod packages;
pub mod pkglist;
