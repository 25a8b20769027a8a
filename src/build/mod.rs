//! Local build steps: running the Node build, copying the static server
//! config and packaging the build output.

mod package;
mod toolchain;

pub use package::{
    DeploymentPackage, STATIC_CONFIG_FILE, StaticConfigOutcome, archive_name, copy_static_config,
};
pub use toolchain::{BuildTool, build_app, user_profile};
